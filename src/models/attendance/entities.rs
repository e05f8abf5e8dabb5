use serde::{Deserialize, Serialize};

// 考勤状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl<'de> Deserialize<'de> for AttendanceStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AttendanceStatus>().map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for AttendanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttendanceStatus::Present => write!(f, "present"),
            AttendanceStatus::Absent => write!(f, "absent"),
            AttendanceStatus::Late => write!(f, "late"),
            AttendanceStatus::Excused => write!(f, "excused"),
        }
    }
}

impl std::str::FromStr for AttendanceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(AttendanceStatus::Present),
            "absent" => Ok(AttendanceStatus::Absent),
            "late" => Ok(AttendanceStatus::Late),
            "excused" => Ok(AttendanceStatus::Excused),
            _ => Err(format!(
                "Invalid attendance status: {s}. supported: present, absent, late, excused"
            )),
        }
    }
}

// 考勤记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attendance {
    pub id: i64,
    pub student_id: i64,
    pub class_id: i64,
    pub date: String,
    pub status: AttendanceStatus,
    pub marked_by: Option<i64>,
    pub remarks: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

// 考勤统计
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AttendanceStats {
    pub total_days: i64,
    pub present_days: i64,
    pub absent_days: i64,
    pub late_days: i64,
    pub attendance_percent: f64,
}

impl AttendanceStats {
    /// 按记录统计出勤，出勤率 = present / total * 100
    pub fn from_records(records: &[Attendance]) -> Self {
        let mut stats = AttendanceStats {
            total_days: records.len() as i64,
            ..Default::default()
        };
        for record in records {
            match record.status {
                AttendanceStatus::Present => stats.present_days += 1,
                AttendanceStatus::Absent => stats.absent_days += 1,
                AttendanceStatus::Late => stats.late_days += 1,
                AttendanceStatus::Excused => {}
            }
        }
        if stats.total_days > 0 {
            stats.attendance_percent =
                stats.present_days as f64 / stats.total_days as f64 * 100.0;
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(status: AttendanceStatus) -> Attendance {
        let now = chrono::Utc::now();
        Attendance {
            id: 0,
            student_id: 1,
            class_id: 1,
            date: "2025-03-01".into(),
            status,
            marked_by: None,
            remarks: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_stats_counts_and_percent() {
        let records = vec![
            record(AttendanceStatus::Present),
            record(AttendanceStatus::Present),
            record(AttendanceStatus::Present),
            record(AttendanceStatus::Absent),
            record(AttendanceStatus::Late),
            record(AttendanceStatus::Excused),
            record(AttendanceStatus::Present),
            record(AttendanceStatus::Absent),
        ];
        let stats = AttendanceStats::from_records(&records);
        assert_eq!(stats.total_days, 8);
        assert_eq!(stats.present_days, 4);
        assert_eq!(stats.absent_days, 2);
        assert_eq!(stats.late_days, 1);
        assert!((stats.attendance_percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_stats_empty() {
        let stats = AttendanceStats::from_records(&[]);
        assert_eq!(stats, AttendanceStats::default());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(
            "late".parse::<AttendanceStatus>().unwrap(),
            AttendanceStatus::Late
        );
        assert!("sick".parse::<AttendanceStatus>().is_err());
    }
}
