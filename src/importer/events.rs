// ==========================================
// HR 数据分析平台 - 上传生命周期事件
// ==========================================
// 终态回调挂在台账落账之后，供外层（通知/统计）订阅。
// 回调失败只记日志，不影响上传结果。
// ==========================================

use crate::domain::upload::IngestSummary;
use tracing::{error, info};

/// 上传终态事件接收器
pub trait UploadEventSink: Send + Sync {
    /// 上传成功提交
    fn upload_completed(&self, upload_id: &str, summary: &IngestSummary);

    /// 上传失败（结构性失败或行校验失败回滚）
    fn upload_failed(&self, upload_id: &str, reason: &str);
}

/// 缺省实现: 结构化日志
pub struct LogEventSink;

impl UploadEventSink for LogEventSink {
    fn upload_completed(&self, upload_id: &str, summary: &IngestSummary) {
        info!(
            upload_id = %upload_id,
            file = %summary.file,
            processed_rows = summary.processed_rows,
            "上传完成"
        );
    }

    fn upload_failed(&self, upload_id: &str, reason: &str) {
        error!(upload_id = %upload_id, reason = %reason, "上传失败");
    }
}

/// 测试/静默场景
pub struct NoopEventSink;

impl UploadEventSink for NoopEventSink {
    fn upload_completed(&self, _upload_id: &str, _summary: &IngestSummary) {}

    fn upload_failed(&self, _upload_id: &str, _reason: &str) {}
}
