use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::{DateTime, TimeZone, Timelike};
use tracing::info;

use super::AdminService;
use super::audit::record_audit;
use crate::models::fees::requests::{
    CreateFeeStructureRequest, FeeStructureListParams, LimitParams, NewPayment,
    RecordPaymentRequest,
};
use crate::models::fees::responses::PaymentRecordedResponse;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{current_user_id, error_response};
use crate::utils::current_academic_year;

const DEFAULT_PAYMENT_LIMIT: u64 = 50;
const MAX_PAYMENT_LIMIT: u64 = 500;

/// 收据号 RCP-YYYYMMDD-nnnnn，后五位取自纳秒
pub fn receipt_number<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "RCP-{}-{:05}",
        now.format("%Y%m%d"),
        now.nanosecond() % 100_000
    )
}

pub async fn list_fee_structures(
    service: &AdminService,
    request: &HttpRequest,
    query: FeeStructureListParams,
) -> ActixResult<HttpResponse> {
    let academic_year = query
        .academic_year
        .filter(|y| !y.trim().is_empty())
        .unwrap_or_else(current_academic_year);

    match service
        .get_storage(request)
        .list_fee_structures(&academic_year)
        .await
    {
        Ok(structures) => Ok(HttpResponse::Ok().json(ApiResponse::success(structures, "ok"))),
        Err(e) => Ok(error_response(&e, "获取收费方案失败")),
    }
}

pub async fn create_fee_structure(
    service: &AdminService,
    request: &HttpRequest,
    structure: CreateFeeStructureRequest,
) -> ActixResult<HttpResponse> {
    if structure.name.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Fee structure name is required",
        )));
    }
    if let Some(item) = structure
        .items
        .iter()
        .find(|item| item.name.trim().is_empty() || item.amount.is_nan() || item.amount < 0.0)
    {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Invalid fee item: '{}'", item.name),
        )));
    }

    let academic_year = structure
        .academic_year
        .clone()
        .filter(|y| !y.trim().is_empty())
        .unwrap_or_else(current_academic_year);

    let storage = service.get_storage(request);
    match storage.create_fee_structure(structure, &academic_year).await {
        Ok(created) => {
            info!(
                "Fee structure {} created for {} with {} items",
                created.name,
                created.academic_year,
                created.items.len()
            );
            record_audit(
                &storage,
                request,
                "create",
                "fee_structure",
                Some(created.id),
                serde_json::to_value(&created).ok(),
            )
            .await;
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(created, "Fee structure created successfully")))
        }
        Err(e) => Ok(error_response(&e, "创建收费方案失败")),
    }
}

pub async fn record_payment(
    service: &AdminService,
    request: &HttpRequest,
    payment: RecordPaymentRequest,
) -> ActixResult<HttpResponse> {
    let collected_by = match current_user_id(request) {
        Ok(id) => id,
        Err(response) => return Ok(response),
    };

    if payment.amount.is_nan() || payment.amount <= 0.0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PaymentInvalid,
            "Payment amount must be greater than 0",
        )));
    }

    let new_payment = NewPayment {
        student_id: payment.student_id,
        student_fee_id: payment.student_fee_id,
        amount: payment.amount,
        payment_method: payment.payment_method,
        transaction_id: payment.transaction_id,
        notes: payment.notes,
        collected_by,
        receipt_number: receipt_number(&chrono::Local::now()),
    };

    let storage = service.get_storage(request);
    match storage.record_payment(new_payment).await {
        Ok(recorded) => {
            record_audit(
                &storage,
                request,
                "create",
                "payment",
                Some(recorded.id),
                serde_json::to_value(&recorded).ok(),
            )
            .await;
            Ok(HttpResponse::Created().json(ApiResponse::success(
                PaymentRecordedResponse {
                    payment_id: recorded.id,
                    receipt_number: recorded.receipt_number,
                },
                "Payment recorded successfully",
            )))
        }
        Err(e) => {
            let code = if e.is_not_found() {
                ErrorCode::FeeNotFound
            } else if e.status_code().is_client_error() {
                ErrorCode::PaymentInvalid
            } else {
                ErrorCode::PaymentFailed
            };
            if e.status_code().is_server_error() {
                tracing::error!("Payment recording failed: {}", e);
            }
            Ok(HttpResponse::build(e.status_code()).json(ApiResponse::error_empty(
                code,
                format!("Payment recording failed: {}", e.message()),
            )))
        }
    }
}

pub async fn list_payments(
    service: &AdminService,
    request: &HttpRequest,
    query: LimitParams,
) -> ActixResult<HttpResponse> {
    let limit = query
        .limit
        .filter(|l| *l > 0)
        .unwrap_or(DEFAULT_PAYMENT_LIMIT)
        .min(MAX_PAYMENT_LIMIT);

    match service.get_storage(request).list_payments(limit).await {
        Ok(payments) => Ok(HttpResponse::Ok().json(ApiResponse::success(payments, "ok"))),
        Err(e) => Ok(error_response(&e, "获取缴费记录失败")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_receipt_number_format() {
        let at = Utc
            .with_ymd_and_hms(2025, 7, 3, 9, 30, 0)
            .unwrap()
            .with_nanosecond(123_004_567)
            .unwrap();
        assert_eq!(receipt_number(&at), "RCP-20250703-04567");

        let receipt = receipt_number(&chrono::Local::now());
        assert_eq!(receipt.len(), "RCP-YYYYMMDD-nnnnn".len());
        assert!(receipt.starts_with("RCP-"));
    }
}
