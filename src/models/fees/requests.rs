use serde::Deserialize;

use super::entities::PaymentMethod;

// 收费方案查询
#[derive(Debug, Deserialize)]
pub struct FeeStructureListParams {
    pub academic_year: Option<String>,
}

// 创建收费项目
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeeItemRequest {
    pub name: String,
    pub amount: f64,
    #[serde(default = "default_frequency")]
    pub frequency: String,
    #[serde(default)]
    pub is_optional: bool,
    #[serde(default = "default_due_day")]
    pub due_day: i32,
}

fn default_frequency() -> String {
    "monthly".to_string()
}

fn default_due_day() -> i32 {
    10
}

// 创建收费方案
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFeeStructureRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub applicable_grades: Vec<i32>,
    pub academic_year: Option<String>,
    #[serde(default)]
    pub items: Vec<CreateFeeItemRequest>,
}

// 记录缴费（来自HTTP请求）
#[derive(Debug, Clone, Deserialize)]
pub struct RecordPaymentRequest {
    pub student_id: i64,
    pub student_fee_id: Option<i64>,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
}

// 缴费写入（存储层）
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub student_id: i64,
    pub student_fee_id: Option<i64>,
    pub amount: f64,
    pub payment_method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
    pub collected_by: i64,
    pub receipt_number: String,
}

// 列表条数
#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fee_item_defaults() {
        let item: CreateFeeItemRequest =
            serde_json::from_str(r#"{"name":"Tuition","amount":1500.0}"#).unwrap();
        assert_eq!(item.frequency, "monthly");
        assert_eq!(item.due_day, 10);
        assert!(!item.is_optional);
    }
}
