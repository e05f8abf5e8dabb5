use serde::{Deserialize, Serialize};

// 应缴费用状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeeStatus {
    Pending,
    Paid,
    Partial,
    Overdue,
    Waived,
}

impl std::fmt::Display for FeeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeeStatus::Pending => write!(f, "pending"),
            FeeStatus::Paid => write!(f, "paid"),
            FeeStatus::Partial => write!(f, "partial"),
            FeeStatus::Overdue => write!(f, "overdue"),
            FeeStatus::Waived => write!(f, "waived"),
        }
    }
}

impl std::str::FromStr for FeeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(FeeStatus::Pending),
            "paid" => Ok(FeeStatus::Paid),
            "partial" => Ok(FeeStatus::Partial),
            "overdue" => Ok(FeeStatus::Overdue),
            "waived" => Ok(FeeStatus::Waived),
            _ => Err(format!("Invalid fee status: {s}")),
        }
    }
}

// 支付方式
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Card,
    Upi,
    BankTransfer,
    Cheque,
    Online,
}

impl<'de> Deserialize<'de> for PaymentMethod {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<PaymentMethod>().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Upi => write!(f, "upi"),
            PaymentMethod::BankTransfer => write!(f, "bank_transfer"),
            PaymentMethod::Cheque => write!(f, "cheque"),
            PaymentMethod::Online => write!(f, "online"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            "upi" => Ok(PaymentMethod::Upi),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "cheque" => Ok(PaymentMethod::Cheque),
            "online" => Ok(PaymentMethod::Online),
            _ => Err(format!(
                "Invalid payment method: {s}. supported: cash, card, upi, bank_transfer, cheque, online"
            )),
        }
    }
}

// 收费项目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeItem {
    pub id: i64,
    pub fee_structure_id: i64,
    pub name: String,
    pub amount: f64,
    pub frequency: String,
    pub is_optional: bool,
    pub due_day: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

// 收费方案
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeStructure {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub applicable_grades: Vec<i32>,
    pub academic_year: String,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
    pub items: Vec<FeeItem>,
}

// 学生应缴费用
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentFee {
    pub id: i64,
    pub student_id: i64,
    pub fee_item_id: i64,
    pub amount: f64,
    pub due_date: String,
    pub status: FeeStatus,
    pub paid_amount: f64,
    pub waiver_amount: f64,
    pub waiver_reason: Option<String>,
    pub academic_year: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl StudentFee {
    /// 计入一笔缴费。已缴金额覆盖 (应缴 - 减免) 时为 paid，否则为 partial
    pub fn apply_payment(&mut self, amount: f64) {
        self.paid_amount += amount;
        self.status = if self.paid_amount >= self.amount - self.waiver_amount {
            FeeStatus::Paid
        } else {
            FeeStatus::Partial
        };
    }

    /// 剩余未缴金额
    pub fn outstanding(&self) -> f64 {
        (self.amount - self.paid_amount - self.waiver_amount).max(0.0)
    }
}

// 缴费记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub student_id: i64,
    pub student_fee_id: Option<i64>,
    pub amount: f64,
    pub payment_method: String,
    pub transaction_id: Option<String>,
    pub receipt_number: String,
    pub payment_date: chrono::DateTime<chrono::Utc>,
    pub status: String,
    pub notes: Option<String>,
    pub collected_by: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fee(amount: f64, paid: f64, waiver: f64) -> StudentFee {
        let now = chrono::Utc::now();
        StudentFee {
            id: 1,
            student_id: 1,
            fee_item_id: 1,
            amount,
            due_date: "2025-04-10".into(),
            status: FeeStatus::Pending,
            paid_amount: paid,
            waiver_amount: waiver,
            waiver_reason: None,
            academic_year: "2025-2026".into(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_payment_settles_fee() {
        let mut f = fee(1000.0, 600.0, 0.0);
        f.apply_payment(500.0);
        assert_eq!(f.paid_amount, 1100.0);
        assert_eq!(f.status, FeeStatus::Paid);
    }

    #[test]
    fn test_payment_partial() {
        let mut f = fee(1000.0, 200.0, 0.0);
        f.apply_payment(500.0);
        assert_eq!(f.status, FeeStatus::Partial);
        assert_eq!(f.outstanding(), 300.0);
    }

    #[test]
    fn test_waiver_counts_towards_settlement() {
        let mut f = fee(1000.0, 0.0, 300.0);
        f.apply_payment(700.0);
        assert_eq!(f.status, FeeStatus::Paid);
        assert_eq!(f.outstanding(), 0.0);
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!(
            "bank_transfer".parse::<PaymentMethod>().unwrap(),
            PaymentMethod::BankTransfer
        );
        assert!(serde_json::from_str::<PaymentMethod>(r#""bitcoin""#).is_err());
    }
}
