//! 竞争名单导出文件读取
//!
//! 导出文件以 `;` 分隔。带可识别表头的文件按列名读取，
//! 其余按列位置读取；整行被引号包成一个字段时按原始行处理。

use std::collections::BTreeMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::AppResult;
use crate::models::RawTableRow;
use crate::services::row_normalizer::{self, NormalizedBatch, RowContext};

/// 至少识别出这么多列名才按命名列处理
const MIN_KNOWN_HEADERS: usize = 2;

/// 解析导出文件内容
pub fn parse_export(text: &str) -> AppResult<Vec<RawTableRow>> {
    let text = text.trim_start_matches('\u{feff}');
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let records = reader
        .records()
        .collect::<Result<Vec<csv::StringRecord>, csv::Error>>()?;
    let records: Vec<csv::StringRecord> = records
        .into_iter()
        .filter(|record| record.iter().any(|field| !field.is_empty()))
        .collect();

    let Some(first) = records.first() else {
        return Ok(Vec::new());
    };

    let known_headers = first
        .iter()
        .filter(|h| row_normalizer::is_known_column(h))
        .count();

    if known_headers >= MIN_KNOWN_HEADERS {
        let headers: Vec<String> = first.iter().map(str::to_string).collect();
        return Ok(records[1..]
            .iter()
            .map(|record| {
                let columns: BTreeMap<String, String> = headers
                    .iter()
                    .cloned()
                    .zip(record.iter().map(str::to_string))
                    .collect();
                RawTableRow::Named(columns)
            })
            .collect());
    }

    Ok(records
        .iter()
        .map(|record| {
            if record.len() == 1 && record[0].contains(';') {
                RawTableRow::Delimited(record[0].to_string())
            } else {
                RawTableRow::Positional(record.iter().map(str::to_string).collect())
            }
        })
        .collect())
}

/// 读取导出文件
pub async fn read_export(path: &Path) -> AppResult<Vec<RawTableRow>> {
    let bytes = tokio::fs::read(path).await?;
    let text = String::from_utf8_lossy(&bytes);
    let rows = parse_export(&text)?;
    debug!("读取导出文件 {}: {} 行", path.display(), rows.len());
    Ok(rows)
}

/// 读取、规范化并删除导出文件
pub async fn normalize_export_file(path: &Path, ctx: &RowContext) -> AppResult<NormalizedBatch> {
    let rows = read_export(path).await?;
    let batch = row_normalizer::normalize_rows(&rows, ctx);
    tokio::fs::remove_file(path).await?;
    info!(
        "[方向 {}] ✓ 解析 {} 名申请人 (跳过 {} 行)，文件已删除: {}",
        ctx.direction_code,
        batch.records.len(),
        batch.rejected,
        path.file_name().unwrap_or_default().to_string_lossy()
    );
    Ok(batch)
}
