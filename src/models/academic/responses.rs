use serde::Serialize;

use super::entities::TimetableEntry;

// 一天的课表
#[derive(Debug, Serialize)]
pub struct TimetableDay {
    pub day: i32,
    pub day_name: &'static str,
    pub periods: Vec<TimetableEntry>,
}

// 班级周课表
#[derive(Debug, Serialize)]
pub struct TimetableResponse {
    pub class_id: i64,
    pub academic_year: String,
    pub days: Vec<TimetableDay>,
}

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

impl TimetableResponse {
    /// 按星期一到星期六分组，没有课的日子 periods 为空数组
    pub fn group_by_day(class_id: i64, academic_year: String, entries: Vec<TimetableEntry>) -> Self {
        let mut days: Vec<TimetableDay> = (1..=6)
            .map(|day| TimetableDay {
                day,
                day_name: DAY_NAMES[day as usize],
                periods: Vec::new(),
            })
            .collect();

        for entry in entries {
            if let Some(slot) = days.iter_mut().find(|d| d.day == entry.day_of_week) {
                slot.periods.push(entry);
            }
        }
        for day in &mut days {
            day.periods.sort_by_key(|p| p.period_number);
        }

        TimetableResponse {
            class_id,
            academic_year,
            days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: i32, period: i32) -> TimetableEntry {
        TimetableEntry {
            id: (day * 10 + period) as i64,
            class_id: 1,
            day_of_week: day,
            period_number: period,
            subject_id: None,
            teacher_id: None,
            start_time: "09:00".into(),
            end_time: "09:45".into(),
            room_number: None,
            academic_year: "2024-2025".into(),
            subject_name: None,
        }
    }

    #[test]
    fn test_group_by_day() {
        let tt = TimetableResponse::group_by_day(
            1,
            "2024-2025".into(),
            vec![entry(1, 2), entry(1, 1), entry(3, 1), entry(0, 1)],
        );
        assert_eq!(tt.days.len(), 6);
        assert_eq!(tt.days[0].day_name, "Monday");
        assert_eq!(tt.days[5].day_name, "Saturday");
        let monday: Vec<i32> = tt.days[0].periods.iter().map(|p| p.period_number).collect();
        assert_eq!(monday, vec![1, 2]);
        assert!(tt.days[1].periods.is_empty());
        assert_eq!(tt.days[2].periods.len(), 1);
        // 周日的条目不在返回范围内
        assert_eq!(tt.days.iter().map(|d| d.periods.len()).sum::<usize>(), 3);
    }

    #[test]
    fn test_empty_days_serialize_as_arrays() {
        let tt = TimetableResponse::group_by_day(1, "2024-2025".into(), vec![]);
        let json = serde_json::to_value(&tt).unwrap();
        assert_eq!(json["days"][0]["periods"], serde_json::json!([]));
    }
}
