//! 行规范化 / 校验
//!
//! 把导出表格的原始行转换为 `ApplicantRecord`。每个字段都有独立的解析函数，
//! 返回 `Result<_, ValidationError>`；实体只在所有字段解析成功后才构造。

use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::error::ValidationError;
use crate::models::{ApplicantRecord, RawTableRow, SubmitStatus};
use crate::utils::logging::truncate_text;

/// "没有分数" 的占位符
pub const NO_POINTS: &str = "—";
/// 申请日期格式，例如 `01.09.2024 в 12:30`
pub const DATE_FORMAT: &str = "%d.%m.%Y в %H:%M";
/// 布尔列的真值
pub const FLAG_TRUE: &str = "Да";

/// 旧版导出：序号、ID、优先级、同意书、总分、考试分、附加分、状态、日期
const SHORT_ROW_LEN: usize = 9;
/// 新版导出：在附加分后多了 БВИ 和优先录取权两列
const FULL_ROW_LEN: usize = 11;

const PLACE_COLUMNS: &[&str] = &["№", "№ п/п", "место", "порядковый номер"];
const ID_COLUMNS: &[&str] = &["id", "уникальный код", "идентификатор", "id абитуриента"];
const PRIORITY_COLUMNS: &[&str] = &["приоритет"];
const SUBMIT_COLUMNS: &[&str] = &["согласие", "подача согласия", "согласие на зачисление"];
const TOTAL_COLUMNS: &[&str] = &["сумма баллов", "сумма конкурсных баллов"];
const EXAM_COLUMNS: &[&str] = &["баллы за ви", "баллы за вступительные испытания"];
const ADDITIONAL_COLUMNS: &[&str] = &["доп. баллы", "баллы за ид", "дополнительные баллы"];
const BVI_COLUMNS: &[&str] = &["бви", "без вступительных испытаний"];
const ADVANTAGE_COLUMNS: &[&str] = &["преимущественное право"];
const DATE_COLUMNS: &[&str] = &["дата подачи", "дата подачи заявления", "дата"];

/// 行所属的上下文
#[derive(Debug, Clone)]
pub struct RowContext {
    pub university_id: u32,
    pub direction_code: String,
}

/// 一批行的规范化结果
#[derive(Debug, Default)]
pub struct NormalizedBatch {
    pub records: Vec<ApplicantRecord>,
    pub rejected: usize,
}

// ========== 字段解析 ==========

/// 只保留数字字符后解析为整数（千位分隔符、不间断空格、单位后缀都会被去掉）
pub fn parse_digits(raw: &str, field: &'static str) -> Result<u64, ValidationError> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(ValidationError::NotNumeric {
            field,
            raw: raw.to_string(),
        });
    }
    digits.parse().map_err(|_| ValidationError::NotNumeric {
        field,
        raw: raw.to_string(),
    })
}

/// 名额：`"300 мест"` → 300
pub fn parse_places(raw: &str, field: &'static str) -> Result<u32, ValidationError> {
    let value = parse_digits(raw, field)?;
    u32::try_from(value).map_err(|_| ValidationError::NotNumeric {
        field,
        raw: raw.to_string(),
    })
}

/// 学费：`"120 000 ₽"` → 120000.0
pub fn parse_price(raw: &str) -> Result<f64, ValidationError> {
    parse_digits(raw, "education_price").map(|v| v as f64)
}

/// 严格的整数字段（序号、ID、优先级），只容忍空白
pub fn parse_int<T: std::str::FromStr>(raw: &str, field: &'static str) -> Result<T, ValidationError> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(ValidationError::Missing { field });
    }
    compact.parse().map_err(|_| ValidationError::NotNumeric {
        field,
        raw: raw.to_string(),
    })
}

/// 分数字段，占位符 `—` 记为 0
pub fn parse_points(raw: &str, field: &'static str) -> Result<u32, ValidationError> {
    if raw.trim() == NO_POINTS {
        return Ok(0);
    }
    parse_places(raw, field)
}

/// 各科考试分数，空格分隔；占位符 `—` 记为 `[0]`
pub fn parse_exam_points(raw: &str) -> Result<Vec<u32>, ValidationError> {
    let trimmed = raw.trim();
    if trimmed == NO_POINTS {
        return Ok(vec![0]);
    }
    if trimmed.is_empty() {
        return Err(ValidationError::Missing {
            field: "exam_points",
        });
    }
    trimmed
        .split_whitespace()
        .map(|part| {
            part.parse::<u32>().map_err(|_| ValidationError::NotNumeric {
                field: "exam_points",
                raw: raw.to_string(),
            })
        })
        .collect()
}

/// 仅当文本恰好为 `Да` 时为真
pub fn parse_flag(raw: &str) -> bool {
    raw.trim() == FLAG_TRUE
}

/// 优先录取权，占位符或空值为 `None`
pub fn parse_advantage(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == NO_POINTS {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDateTime, ValidationError> {
    NaiveDateTime::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| ValidationError::BadDate {
        field: "date",
        raw: raw.to_string(),
    })
}

pub fn parse_submit(raw: &str) -> Result<SubmitStatus, ValidationError> {
    SubmitStatus::from_label(raw).ok_or_else(|| ValidationError::UnknownValue {
        field: "submit",
        raw: raw.to_string(),
    })
}

// ========== 行解析 ==========

/// 已拆分但尚未校验的行字段
struct RowFields<'a> {
    place: &'a str,
    applicant_id: &'a str,
    priority: &'a str,
    submit: &'a str,
    total_points: &'a str,
    exam_points: &'a str,
    additional_points: &'a str,
    without_entrance_exams: Option<&'a str>,
    advantage: Option<&'a str>,
    date: &'a str,
}

impl<'a> RowFields<'a> {
    fn from_positional(fields: &'a [String]) -> Result<Self, ValidationError> {
        // 行尾多余的分号会产生空字段
        let mut len = fields.len();
        while len > SHORT_ROW_LEN && len != FULL_ROW_LEN && fields[len - 1].trim().is_empty() {
            len -= 1;
        }
        let f = &fields[..len];

        match len {
            SHORT_ROW_LEN => Ok(Self {
                place: &f[0],
                applicant_id: &f[1],
                priority: &f[2],
                submit: &f[3],
                total_points: &f[4],
                exam_points: &f[5],
                additional_points: &f[6],
                without_entrance_exams: None,
                advantage: None,
                date: &f[8],
            }),
            FULL_ROW_LEN => Ok(Self {
                place: &f[0],
                applicant_id: &f[1],
                priority: &f[2],
                submit: &f[3],
                total_points: &f[4],
                exam_points: &f[5],
                additional_points: &f[6],
                without_entrance_exams: Some(&f[7]),
                advantage: Some(&f[8]),
                date: &f[10],
            }),
            actual => Err(ValidationError::RowShape {
                expected: "9 或 11",
                actual,
            }),
        }
    }

    fn from_named(columns: &'a std::collections::BTreeMap<String, String>) -> Result<Self, ValidationError> {
        let lookup = |aliases: &[&str]| -> Option<&'a str> {
            columns
                .iter()
                .find(|(header, _)| aliases.contains(&header.trim().to_lowercase().as_str()))
                .map(|(_, value)| value.as_str())
        };
        let require = |aliases: &[&str], field: &'static str| {
            lookup(aliases).ok_or(ValidationError::Missing { field })
        };

        Ok(Self {
            place: require(PLACE_COLUMNS, "place")?,
            applicant_id: require(ID_COLUMNS, "applicant_id")?,
            priority: require(PRIORITY_COLUMNS, "priority")?,
            submit: lookup(SUBMIT_COLUMNS).unwrap_or(""),
            total_points: require(TOTAL_COLUMNS, "total_points")?,
            exam_points: require(EXAM_COLUMNS, "exam_points")?,
            additional_points: lookup(ADDITIONAL_COLUMNS).unwrap_or(NO_POINTS),
            without_entrance_exams: lookup(BVI_COLUMNS),
            advantage: lookup(ADVANTAGE_COLUMNS),
            date: require(DATE_COLUMNS, "date")?,
        })
    }

    fn into_record(self, ctx: &RowContext) -> Result<ApplicantRecord, ValidationError> {
        Ok(ApplicantRecord {
            university_id: ctx.university_id,
            direction_code: ctx.direction_code.clone(),
            applicant_id: parse_int(self.applicant_id, "applicant_id")?,
            place: parse_int(self.place, "place")?,
            priority: parse_int(self.priority, "priority")?,
            submit_status: parse_submit(self.submit)?,
            total_points: parse_points(self.total_points, "total_points")?,
            exam_points: parse_exam_points(self.exam_points)?,
            additional_points: parse_points(self.additional_points, "additional_points")?,
            without_entrance_exams: self.without_entrance_exams.map(parse_flag).unwrap_or(false),
            advantage: self.advantage.and_then(parse_advantage),
            date: parse_date(self.date)?,
        })
    }
}

/// 表头是否能被识别为命名列
pub fn is_known_column(header: &str) -> bool {
    let header = header.trim().to_lowercase();
    [
        PLACE_COLUMNS,
        ID_COLUMNS,
        PRIORITY_COLUMNS,
        SUBMIT_COLUMNS,
        TOTAL_COLUMNS,
        EXAM_COLUMNS,
        ADDITIONAL_COLUMNS,
        BVI_COLUMNS,
        ADVANTAGE_COLUMNS,
        DATE_COLUMNS,
    ]
    .iter()
    .any(|aliases| aliases.contains(&header.as_str()))
}

/// 规范化单行
pub fn normalize_row(row: &RawTableRow, ctx: &RowContext) -> Result<ApplicantRecord, ValidationError> {
    match row {
        RawTableRow::Delimited(line) => {
            let fields = RawTableRow::split_delimited(line);
            RowFields::from_positional(&fields)?.into_record(ctx)
        }
        RawTableRow::Positional(fields) => RowFields::from_positional(fields)?.into_record(ctx),
        RawTableRow::Named(columns) => RowFields::from_named(columns)?.into_record(ctx),
    }
}

/// 规范化一批行：单行失败只记录并跳过，不影响其余行
pub fn normalize_rows(rows: &[RawTableRow], ctx: &RowContext) -> NormalizedBatch {
    let mut batch = NormalizedBatch::default();
    for row in rows {
        match normalize_row(row, ctx) {
            Ok(record) => batch.records.push(record),
            Err(e) => {
                warn!(
                    "[方向 {}] ⚠️ 跳过无法解析的行 ({}): {}",
                    ctx.direction_code,
                    e,
                    truncate_text(&row.raw_content(), 200)
                );
                batch.rejected += 1;
            }
        }
    }
    debug!(
        "[方向 {}] 规范化完成: 成功 {}, 跳过 {}",
        ctx.direction_code,
        batch.records.len(),
        batch.rejected
    );
    batch
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn ctx() -> RowContext {
        RowContext {
            university_id: 43,
            direction_code: "2.20.03.01".to_string(),
        }
    }

    fn row(fields: &[&str]) -> RawTableRow {
        RawTableRow::Positional(fields.iter().map(|s| s.to_string()).collect())
    }

    fn sept_first() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 9, 1)
            .unwrap()
            .and_hms_opt(12, 30, 0)
            .unwrap()
    }

    #[test]
    fn no_points_sentinel_becomes_single_zero() {
        assert_eq!(parse_exam_points("—"), Ok(vec![0]));
        assert_eq!(parse_exam_points(" — "), Ok(vec![0]));
        assert_eq!(parse_points("—", "total_points"), Ok(0));
    }

    #[test]
    fn exam_points_split_on_whitespace() {
        assert_eq!(parse_exam_points("30 90 60"), Ok(vec![30, 90, 60]));
        assert_eq!(parse_exam_points("30  90\t60"), Ok(vec![30, 90, 60]));
        assert!(parse_exam_points("30 девяносто").is_err());
    }

    #[test]
    fn places_keep_only_digit_characters() {
        assert_eq!(parse_places("300 мест", "total_places"), Ok(300));
        assert_eq!(parse_places("1\u{a0}200 мест", "total_places"), Ok(1200));
        assert_eq!(parse_places(" 1 2 3 ", "total_places"), Ok(123));
        assert!(parse_places("мест нет", "total_places").is_err());
    }

    #[test]
    fn price_strips_separators_and_currency() {
        assert_eq!(parse_price("120 000 ₽"), Ok(120000.0));
        assert_eq!(parse_price("95\u{a0}500 ₽ в год"), Ok(95500.0));
    }

    #[test]
    fn flag_requires_exact_match() {
        assert!(parse_flag("Да"));
        assert!(!parse_flag("да"));
        assert!(!parse_flag("Нет"));
        assert!(!parse_flag("—"));
    }

    #[test]
    fn advantage_sentinel_is_none() {
        assert_eq!(parse_advantage("—"), None);
        assert_eq!(parse_advantage(""), None);
        assert_eq!(
            parse_advantage(" Дети-сироты "),
            Some("Дети-сироты".to_string())
        );
    }

    #[test]
    fn date_uses_the_exact_site_format() {
        assert_eq!(parse_date("01.09.2024 в 12:30"), Ok(sept_first()));
        assert!(matches!(
            parse_date("2024/09/01"),
            Err(ValidationError::BadDate { .. })
        ));
    }

    #[test]
    fn short_positional_row_normalizes() {
        let record = normalize_row(
            &row(&[
                "5",
                "1001",
                "1",
                "Электронное",
                "240",
                "30 90 60",
                "10",
                "Участвуете в конкурсе",
                "01.09.2024 в 12:30",
            ]),
            &ctx(),
        )
        .unwrap();

        assert_eq!(record.place, 5);
        assert_eq!(record.applicant_id, 1001);
        assert_eq!(record.priority, 1);
        assert_eq!(record.submit_status, SubmitStatus::Electronic);
        assert_eq!(record.total_points, 240);
        assert_eq!(record.exam_points, vec![30, 90, 60]);
        assert_eq!(record.additional_points, 10);
        assert!(!record.without_entrance_exams);
        assert_eq!(record.advantage, None);
        assert_eq!(record.date, sept_first());
        assert_eq!(record.university_id, 43);
        assert_eq!(record.direction_code, "2.20.03.01");
    }

    #[test]
    fn full_positional_row_reads_bvi_and_advantage() {
        let record = normalize_row(
            &row(&[
                "1",
                "2002",
                "2",
                "Бумажное",
                "—",
                "—",
                "0",
                "Да",
                "Участники СВО",
                "Участвуете в конкурсе",
                "15.07.2024 в 09:05",
            ]),
            &ctx(),
        )
        .unwrap();

        assert_eq!(record.submit_status, SubmitStatus::Paper);
        assert_eq!(record.total_points, 0);
        assert_eq!(record.exam_points, vec![0]);
        assert!(record.without_entrance_exams);
        assert_eq!(record.advantage.as_deref(), Some("Участники СВО"));
    }

    #[test]
    fn delimited_line_with_trailing_separator() {
        let line = r#""7";"3003";"3";"_";"199";"60 70 69";"0";"Участвуете в конкурсе";"20.07.2024 в 18:00";"#;
        let record = normalize_row(&RawTableRow::Delimited(line.to_string()), &ctx()).unwrap();
        assert_eq!(record.place, 7);
        assert_eq!(record.submit_status, SubmitStatus::NotSubmitted);
        assert_eq!(record.exam_points, vec![60, 70, 69]);
    }

    #[test]
    fn named_columns_are_matched_case_insensitively() {
        let columns: BTreeMap<String, String> = [
            ("№", "12"),
            ("ID", "4004"),
            ("Приоритет", "1"),
            ("Согласие", "Электронное"),
            ("Сумма баллов", "251"),
            ("Баллы за ВИ", "80 85 76"),
            ("Доп. баллы", "10"),
            ("БВИ", "Нет"),
            ("Преимущественное право", "—"),
            ("Дата подачи", "01.09.2024 в 12:30"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let record = normalize_row(&RawTableRow::Named(columns), &ctx()).unwrap();
        assert_eq!(record.place, 12);
        assert_eq!(record.applicant_id, 4004);
        assert_eq!(record.total_points, 251);
        assert!(!record.without_entrance_exams);
        assert_eq!(record.advantage, None);
    }

    #[test]
    fn named_row_without_date_column_is_rejected() {
        let columns: BTreeMap<String, String> = [("№", "1"), ("ID", "1")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        assert!(matches!(
            normalize_row(&RawTableRow::Named(columns), &ctx()),
            Err(ValidationError::Missing { .. })
        ));
    }

    #[test]
    fn wrong_column_count_is_a_shape_error() {
        assert!(matches!(
            normalize_row(&row(&["1", "2", "3"]), &ctx()),
            Err(ValidationError::RowShape { actual: 3, .. })
        ));
    }

    #[test]
    fn one_bad_row_does_not_abort_the_batch() {
        let rows = vec![
            row(&["1", "11", "1", "Электронное", "250", "80 90 80", "0", "-", "01.09.2024 в 12:30"]),
            row(&["2", "12", "1", "Электронное", "240", "80 80 80", "0", "-", "2024/09/01"]),
            row(&["3", "13", "1", "Бумажное", "230", "70 80 80", "0", "-", "02.09.2024 в 08:00"]),
        ];
        let batch = normalize_rows(&rows, &ctx());
        assert_eq!(batch.rejected, 1);
        let ids: Vec<u64> = batch.records.iter().map(|r| r.applicant_id).collect();
        assert_eq!(ids, vec![11, 13]);
    }

    #[test]
    fn known_columns_are_recognized() {
        assert!(is_known_column(" Сумма баллов "));
        assert!(is_known_column("id"));
        assert!(!is_known_column("5"));
    }
}
