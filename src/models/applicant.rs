use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::infrastructure::publisher::{Channel, Message};
use crate::models::enums::SubmitStatus;

/// 竞争名单中的一行（一个申请人）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantRecord {
    pub university_id: u32,
    pub direction_code: String,
    pub applicant_id: u64,
    /// 名单中的序号
    pub place: u32,
    pub priority: u32,
    #[serde(rename = "submit")]
    pub submit_status: SubmitStatus,
    pub total_points: u32,
    #[serde(rename = "entrance_exam_points")]
    pub exam_points: Vec<u32>,
    pub additional_points: u32,
    /// 免试录取（БВИ）
    pub without_entrance_exams: bool,
    /// 优先录取权
    pub advantage: Option<String>,
    pub date: NaiveDateTime,
}

impl Message for ApplicantRecord {
    const CHANNEL: Channel = Channel::Applicants;

    fn key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.university_id, self.direction_code, self.applicant_id
        )
    }
}
