use serde::Deserialize;

use super::entities::AttendanceStatus;

// multipart 中 attendance 字段的单条记录
#[derive(Debug, Clone, Deserialize)]
pub struct AttendanceEntry {
    pub student_id: serde_json::Value,
    pub status: String,
    pub remarks: Option<String>,
}

impl AttendanceEntry {
    /// 学生 ID 可以是数字或数字字符串，非正数及其他情况返回 None
    pub fn student_id(&self) -> Option<i64> {
        let id = match &self.student_id {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.trim().parse().ok(),
            _ => None,
        };
        id.filter(|id| *id > 0)
    }
}

// 单个学生的考勤写入
#[derive(Debug, Clone)]
pub struct AttendanceRecord {
    pub student_id: i64,
    pub status: AttendanceStatus,
    pub remarks: Option<String>,
}

// 一次点名（存储层，整体在一个事务中写入）
#[derive(Debug, Clone)]
pub struct AttendanceBatch {
    pub class_id: i64,
    pub date: String,
    pub marked_by: i64,
    pub photo_url: Option<String>,
    pub records: Vec<AttendanceRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_student_id_forms() {
        let entries: Vec<AttendanceEntry> = serde_json::from_str(
            r#"[
                {"student_id": 7, "status": "present"},
                {"student_id": "8", "status": "absent", "remarks": "sick"},
                {"student_id": "not-an-id", "status": "present"},
                {"student_id": null, "status": "late"},
                {"student_id": 0, "status": "present"},
                {"student_id": "-3", "status": "absent"}
            ]"#,
        )
        .unwrap();
        let ids: Vec<Option<i64>> = entries.iter().map(|e| e.student_id()).collect();
        assert_eq!(ids, vec![Some(7), Some(8), None, None, None, None]);
    }
}
