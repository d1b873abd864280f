use std::collections::BTreeMap;

/// 导出表格中的原始行，读出后立即交给规范化器，不落盘
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTableRow {
    /// 整行未拆分：`"5";"1001";...`
    Delimited(String),
    /// 已按列拆分
    Positional(Vec<String>),
    /// 带表头的列
    Named(BTreeMap<String, String>),
}

impl RawTableRow {
    /// 按 `;` 拆分并去掉引号
    pub fn split_delimited(line: &str) -> Vec<String> {
        line.split(';')
            .map(|field| field.replace('"', "").trim().to_string())
            .collect()
    }

    /// 用于日志输出的原始内容
    pub fn raw_content(&self) -> String {
        match self {
            RawTableRow::Delimited(line) => line.clone(),
            RawTableRow::Positional(fields) => fields.join(";"),
            RawTableRow::Named(columns) => columns
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(";"),
        }
    }
}
