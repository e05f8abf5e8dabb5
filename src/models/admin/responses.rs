use serde::Serialize;

use super::entities::AuditLog;
use crate::models::fees::entities::{FeeStatus, StudentFee};

// 收费汇总
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct FeeStats {
    pub total_due: f64,
    pub total_collected: f64,
    pub total_pending: f64,
    pub total_overdue: f64,
    pub collection_rate_percent: f64,
}

impl FeeStats {
    pub fn from_fees(fees: &[StudentFee]) -> Self {
        let mut stats = FeeStats::default();
        for fee in fees {
            stats.total_due += fee.amount;
            stats.total_collected += fee.paid_amount;
            match fee.status {
                FeeStatus::Pending => stats.total_pending += fee.outstanding(),
                FeeStatus::Overdue => stats.total_overdue += fee.outstanding(),
                _ => {}
            }
        }
        if stats.total_due > 0.0 {
            stats.collection_rate_percent = stats.total_collected / stats.total_due * 100.0;
        }
        stats
    }
}

// 管理员首页
#[derive(Debug, Serialize)]
pub struct AdminDashboardResponse {
    pub total_users: u64,
    pub total_students: u64,
    pub total_teachers: u64,
    pub total_classes: u64,
    pub fee_collection: FeeStats,
    pub recent_activity: Vec<AuditLog>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee(amount: f64, paid: f64, status: FeeStatus) -> StudentFee {
        let now = chrono::Utc::now();
        StudentFee {
            id: 1,
            student_id: 1,
            fee_item_id: 1,
            amount,
            due_date: "2025-04-10".into(),
            status,
            paid_amount: paid,
            waiver_amount: 0.0,
            waiver_reason: None,
            academic_year: "2025-2026".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_fee_stats() {
        let stats = FeeStats::from_fees(&[
            fee(1000.0, 1000.0, FeeStatus::Paid),
            fee(500.0, 0.0, FeeStatus::Pending),
            fee(500.0, 0.0, FeeStatus::Overdue),
        ]);
        assert_eq!(stats.total_due, 2000.0);
        assert_eq!(stats.total_collected, 1000.0);
        assert_eq!(stats.total_pending, 500.0);
        assert_eq!(stats.total_overdue, 500.0);
        assert_eq!(stats.collection_rate_percent, 50.0);
    }

    #[test]
    fn test_fee_stats_empty() {
        assert_eq!(FeeStats::from_fees(&[]), FeeStats::default());
    }
}
