use serde::Serialize;

// 记录缴费后的响应
#[derive(Debug, Serialize)]
pub struct PaymentRecordedResponse {
    pub payment_id: i64,
    pub receipt_number: String,
}
