// ==========================================
// HR 数据分析平台 - 上传编排器
// ==========================================
// 职责: 整合上传流程，从工作簿到数据库
// 流程: 形态判定 → (模板/Vendor 行源) → 清洗 → 解析落库 → 聚合裁决
// 状态机: OPENED → (TEMPLATE_MODE | VENDOR_MODE) → COMMITTING
//         → {COMMITTED | ROLLED_BACK}
// 裁决规则: 任一行失败 → 整笔业务数据回滚；行级诊断在事务终结后
// 经独立台账路径落盘，回滚也不丢失
// ==========================================

use crate::config::IngestConfig;
use crate::domain::types::{RowErrorKind, SheetMapping, UploadStatus, WorkbookShape};
use crate::domain::upload::{
    IngestSummary, ReportingPeriod, RowError, SheetSummary, UploadJob, UploadOptions,
};
use crate::importer::contract::{
    self, SHEET_DEPARTMENTS, SHEET_EMPLOYEES, SHEET_ENGAGEMENT, SHEET_EXITS, SHEET_LEAVE,
    SHEET_ONBOARDING, SHEET_SICKBAY, SHEET_STATUTORY, SHEET_TRAINING, SHEET_UPLOAD_METADATA,
    SHEET_VACANCIES,
};
use crate::importer::error::{IngestError, IngestResult};
use crate::importer::events::UploadEventSink;
use crate::importer::resolvers::{
    DepartmentResolver, EmployeeResolver, EngagementResolver, EntityResolver, ExitResolver,
    LeaveResolver, OnboardingResolver, ResolveMode, RowOutcome, RowView, SickbayResolver,
    StatutoryResolver, TrainingResolver, UploadContext, VacancyResolver,
};
use crate::importer::sanitizer::sanitize_row;
use crate::importer::shape;
use crate::importer::workbook::{self, Sheet, Workbook};
use crate::repository::UploadLedger;
use chrono::Utc;
use rusqlite::{Connection, Transaction};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// 缺省上传者标识
const DEFAULT_UPLOADER: &str = "api";

// ==========================================
// WorkbookIngestor - 上传入口接口
// ==========================================
#[async_trait::async_trait]
pub trait WorkbookIngestor {
    /// 从文件（.xlsx/.xls/.csv）摄取
    async fn ingest_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        options: UploadOptions,
    ) -> IngestResult<IngestSummary>;

    /// 从已解析的工作簿摄取
    async fn ingest_workbook(
        &self,
        workbook: &Workbook,
        filename: &str,
        options: UploadOptions,
    ) -> IngestResult<IngestSummary>;

    /// 批量摄取多个文件（并发执行，互不阻断）
    async fn batch_ingest<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
        options: UploadOptions,
    ) -> Vec<Result<IngestSummary, String>>;
}

// ==========================================
// UploadOrchestrator - 上传编排器实现
// ==========================================
pub struct UploadOrchestrator {
    // 业务数据连接（单写者，事务内独占）
    conn: Arc<Mutex<Connection>>,

    // 上传任务台账（独立于业务事务的写路径）
    ledger: UploadLedger,

    // 节假日等摄取配置
    config: IngestConfig,

    // 终态事件接收器
    events: Box<dyn UploadEventSink>,
}

impl UploadOrchestrator {
    pub fn new(
        conn: Arc<Mutex<Connection>>,
        config: IngestConfig,
        events: Box<dyn UploadEventSink>,
    ) -> Self {
        let ledger = UploadLedger::new(Arc::clone(&conn));
        Self {
            conn,
            ledger,
            config,
            events,
        }
    }

    pub fn ledger(&self) -> &UploadLedger {
        &self.ledger
    }

    /// 单事务处理整个工作簿（锁与事务的生命周期均限于本函数）
    ///
    /// 聚合裁决: 行错误不中断遍历，遍历结束后任一失败即回滚并
    /// 返回 ValidationFailed（携带全部行级诊断）
    fn process_workbook(
        &self,
        workbook: &Workbook,
        filename: &str,
        upload_id: &str,
        options: &UploadOptions,
    ) -> IngestResult<IngestSummary> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| IngestError::InternalError(format!("锁获取失败: {}", e)))?;
        let tx = conn.unchecked_transaction()?;

        let sheet_names = workbook.sheet_names();
        let mut summary = IngestSummary::new(filename);

        match shape::detect(&sheet_names) {
            WorkbookShape::Template => {
                debug!("形态判定: 模板工作簿");
                let mut ctx = UploadContext::new(upload_id, filename, ResolveMode::Strict);
                ctx.holidays = self.config.merged_holidays(&options.extra_holidays);
                self.run_template(&tx, workbook, &mut ctx, &mut summary)?;
                summary.period = ctx.period;
                summary.leave_days_by_period = ctx.leave_days_by_period;
            }
            WorkbookShape::Vendor if sheet_names.iter().any(|n| n == SHEET_UPLOAD_METADATA) => {
                // 带模板标记但必需 sheet 不齐: 按模板对待并整体报缺
                let missing: Vec<String> = contract::REQUIRED_SHEETS
                    .iter()
                    .filter(|required| !sheet_names.iter().any(|n| n == *required))
                    .map(|s| s.to_string())
                    .collect();
                warn!(missing = ?missing, "模板工作簿缺必需 sheet");
                return Err(IngestError::MissingSheet { sheets: missing });
            }
            WorkbookShape::Vendor => {
                debug!("形态判定: Vendor 工作簿, 进入表头嗅探");
                let mut ctx = UploadContext::new(upload_id, filename, ResolveMode::Lenient);
                ctx.holidays = self.config.merged_holidays(&options.extra_holidays);
                self.run_vendor(&tx, workbook, &mut ctx, &mut summary)?;
                summary.leave_days_by_period = ctx.leave_days_by_period;
            }
        }

        // COMMITTING: 聚合裁决
        if summary.failed_rows > 0 {
            info!(
                failed_rows = summary.failed_rows,
                "存在行级失败, 回滚业务数据"
            );
            tx.rollback()?;
            return Err(IngestError::ValidationFailed {
                errors: summary.errors,
            });
        }

        tx.commit()?;
        Ok(summary)
    }

    /// 模板模式: UploadMetadata 先行, 固定 sheet 顺序 + 列契约
    fn run_template(
        &self,
        tx: &Transaction,
        workbook: &Workbook,
        ctx: &mut UploadContext,
        summary: &mut IngestSummary,
    ) -> IngestResult<()> {
        // === 步骤 1: 报表期间 ===
        debug!("步骤 1: 解析 UploadMetadata");
        let metadata_sheet = workbook
            .sheet(SHEET_UPLOAD_METADATA)
            .ok_or_else(|| IngestError::MissingSheet {
                sheets: vec![SHEET_UPLOAD_METADATA.to_string()],
            })?;
        self.check_columns(metadata_sheet)?;
        let metadata_summary = self.extract_reporting_period(metadata_sheet, ctx);
        summary.push_sheet(metadata_summary);

        // === 步骤 2: 固定顺序处理必需 sheet ===
        // 部门先于员工（外键挂接），员工先于请假（员工回链）
        let ordered: [(&str, Box<dyn EntityResolver>); 3] = [
            (SHEET_DEPARTMENTS, Box::new(DepartmentResolver)),
            (SHEET_EMPLOYEES, Box::new(EmployeeResolver::new(SHEET_EMPLOYEES))),
            (SHEET_LEAVE, Box::new(LeaveResolver::new(SHEET_LEAVE))),
        ];
        for (name, resolver) in ordered {
            debug!(sheet = %name, "步骤 2: 处理必需 sheet");
            let sheet = workbook.sheet(name).ok_or_else(|| IngestError::MissingSheet {
                sheets: vec![name.to_string()],
            })?;
            self.check_columns(sheet)?;
            let sheet_summary = self.run_sheet(tx, sheet, resolver.as_ref(), ctx, None);
            summary.push_sheet(sheet_summary);
        }

        // === 步骤 3: 可选 sheet（缺失静默跳过）===
        for name in contract::OPTIONAL_SHEETS {
            let sheet = match workbook.sheet(name) {
                Some(sheet) => sheet,
                None => continue,
            };
            debug!(sheet = %name, "步骤 3: 处理可选 sheet");
            self.check_columns(sheet)?;
            let resolver: Box<dyn EntityResolver> = match name {
                SHEET_TRAINING => Box::new(TrainingResolver::new(name)),
                SHEET_SICKBAY => Box::new(SickbayResolver::new(name)),
                SHEET_ONBOARDING => Box::new(OnboardingResolver::new(name)),
                SHEET_EXITS => Box::new(ExitResolver::new(name)),
                SHEET_VACANCIES => Box::new(VacancyResolver),
                SHEET_ENGAGEMENT => Box::new(EngagementResolver),
                SHEET_STATUTORY => Box::new(StatutoryResolver),
                _ => continue,
            };
            let sheet_summary = self.run_sheet(tx, sheet, resolver.as_ref(), ctx, None);
            summary.push_sheet(sheet_summary);
        }

        Ok(())
    }

    /// Vendor 模式: 逐 sheet 表头嗅探，花名册/请假表喂同一组解析器
    fn run_vendor(
        &self,
        tx: &Transaction,
        workbook: &Workbook,
        ctx: &mut UploadContext,
        summary: &mut IngestSummary,
    ) -> IngestResult<()> {
        let mut recognized = 0usize;

        // 花名册先于请假表（请假解析依赖员工映射）
        let mut classified: Vec<(&Sheet, SheetMapping)> = Vec::new();
        for sheet in &workbook.sheets {
            match shape::classify_sheet(&sheet.headers) {
                Some(mapping) => {
                    info!(sheet = %sheet.name, mapping = ?mapping, "Vendor sheet 命中启发式");
                    classified.push((sheet, mapping));
                    recognized += 1;
                }
                None => {
                    debug!(sheet = %sheet.name, "Vendor sheet 未命中启发式, 跳过");
                }
            }
        }

        if recognized == 0 {
            return Err(IngestError::UnrecognizedWorkbookShape);
        }

        classified.sort_by_key(|(_, mapping)| match mapping {
            SheetMapping::EmployeeRoster => 0,
            SheetMapping::LeaveTable => 1,
        });

        for (sheet, mapping) in classified {
            let resolver: Box<dyn EntityResolver> = match mapping {
                SheetMapping::EmployeeRoster => Box::new(EmployeeResolver::new(&sheet.name)),
                SheetMapping::LeaveTable => Box::new(LeaveResolver::new(&sheet.name)),
            };
            let sheet_summary = self.run_sheet(tx, sheet, resolver.as_ref(), ctx, Some(mapping));
            summary.push_sheet(sheet_summary);
        }

        Ok(())
    }

    /// 严格模式 sheet 的列契约校验（命中契约的 sheet 才校验）
    fn check_columns(&self, sheet: &Sheet) -> IngestResult<()> {
        if let Some(expected) = contract::expected_columns(&sheet.name) {
            contract::validate_columns(&sheet.headers, expected, &sheet.name)?;
        }
        Ok(())
    }

    /// 逐行处理单个 sheet
    ///
    /// 行错误不中断遍历; 错误附带清洗后行内容的 JSON 快照
    fn run_sheet(
        &self,
        tx: &Transaction,
        sheet: &Sheet,
        resolver: &dyn EntityResolver,
        ctx: &mut UploadContext,
        mapping: Option<SheetMapping>,
    ) -> SheetSummary {
        let mut sheet_summary = SheetSummary::new(&sheet.name);
        sheet_summary.mapping = mapping;

        for row in &sheet.rows {
            let clean = sanitize_row(row);
            match resolver.resolve(tx, ctx, &clean) {
                Ok(RowOutcome::Applied) => {
                    sheet_summary.processed_rows += 1;
                }
                Ok(RowOutcome::SkippedDuplicateOverlap) => {
                    sheet_summary.processed_rows += 1;
                    sheet_summary.skipped_rows += 1;
                }
                Ok(RowOutcome::SkippedMissingLink) => {
                    sheet_summary.skipped_rows += 1;
                }
                Err(mut row_error) => {
                    row_error.sample = serde_json::to_string(&clean.cells).ok();
                    warn!(
                        sheet = %row_error.sheet,
                        row = row_error.row,
                        message = %row_error.message,
                        "行处理失败"
                    );
                    sheet_summary.failed_rows += 1;
                    sheet_summary.errors.push(row_error);
                }
            }
        }

        info!(
            sheet = %sheet.name,
            processed = sheet_summary.processed_rows,
            failed = sheet_summary.failed_rows,
            skipped = sheet_summary.skipped_rows,
            "sheet 处理完成"
        );
        sheet_summary
    }

    /// UploadMetadata 首行 → 报表期间
    ///
    /// 起止任一不可解析 → 行失败（终裁决时整笔回滚）
    fn extract_reporting_period(&self, sheet: &Sheet, ctx: &mut UploadContext) -> SheetSummary {
        let mut sheet_summary = SheetSummary::new(SHEET_UPLOAD_METADATA);

        let row = match sheet.rows.first() {
            Some(row) => sanitize_row(row),
            None => return sheet_summary,
        };
        let view = RowView::new(&row, SHEET_UPLOAD_METADATA);

        let start = view.date(&["reporting_period_start"]);
        let end = view.date(&["reporting_period_end"]);
        match (start, end) {
            (Some(start), Some(end)) => {
                ctx.period = Some(ReportingPeriod { start, end });
                sheet_summary.processed_rows += 1;
            }
            _ => {
                let mut row_error = view.error(
                    Some("reporting_period_start"),
                    RowErrorKind::InvalidDates,
                    "invalid or missing reporting period",
                );
                row_error.sample = serde_json::to_string(&row.cells).ok();
                sheet_summary.failed_rows += 1;
                sheet_summary.errors.push(row_error);
            }
        }

        sheet_summary
    }

    /// 终态落账: 行级诊断 + 台账状态（业务事务之外执行）
    fn finalize(
        &self,
        upload_id: &str,
        outcome: &IngestResult<IngestSummary>,
    ) -> IngestResult<()> {
        match outcome {
            Ok(summary) => {
                self.ledger.complete_job(
                    upload_id,
                    summary.processed_rows as i64,
                    summary.failed_rows as i64,
                    summary.period,
                )?;
                self.events.upload_completed(upload_id, summary);
            }
            Err(IngestError::ValidationFailed { errors }) => {
                // 业务数据已回滚，诊断记录仍要落盘
                let flushed = self.ledger.insert_errors(upload_id, errors)?;
                debug!(count = flushed, "行级诊断已落盘");
                let error_summary = serde_json::to_string(errors)?;
                self.ledger.fail_job(upload_id, &error_summary)?;
                self.events
                    .upload_failed(upload_id, &format!("{} 行校验失败", errors.len()));
            }
            Err(err) => {
                // 缺 sheet 也要逐个落一条诊断记录（无行级明细）
                if let IngestError::MissingSheet { sheets } = err {
                    let errors: Vec<RowError> = sheets
                        .iter()
                        .map(|sheet| RowError {
                            sheet: sheet.clone(),
                            row: 0,
                            column: None,
                            message: format!("missing_sheet: {}", sheet),
                            kind: RowErrorKind::RowFailed,
                            sample: None,
                        })
                        .collect();
                    self.ledger.insert_errors(upload_id, &errors)?;
                }
                self.ledger.fail_job(upload_id, &err.to_string())?;
                self.events.upload_failed(upload_id, &err.to_string());
            }
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl WorkbookIngestor for UploadOrchestrator {
    #[instrument(skip(self, file_path, options), fields(upload_id))]
    async fn ingest_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        options: UploadOptions,
    ) -> IngestResult<IngestSummary> {
        let path = file_path.as_ref();
        if !path.exists() {
            return Err(IngestError::FileNotFound(path.display().to_string()));
        }
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();

        let workbook = workbook::load_workbook(path)?;
        self.ingest_workbook(&workbook, &filename, options).await
    }

    async fn ingest_workbook(
        &self,
        workbook: &Workbook,
        filename: &str,
        options: UploadOptions,
    ) -> IngestResult<IngestSummary> {
        let upload_id = Uuid::new_v4().to_string();
        let uploader = options
            .uploader
            .clone()
            .unwrap_or_else(|| DEFAULT_UPLOADER.to_string());

        info!(
            upload_id = %upload_id,
            file = %filename,
            uploader = %uploader,
            sheets = workbook.sheets.len(),
            "开始摄取工作簿"
        );

        // 台账先记 PROCESSING（独立于业务事务）
        let job = UploadJob {
            id: upload_id.clone(),
            filename: filename.to_string(),
            uploader,
            status: UploadStatus::Processing,
            processed_rows: 0,
            failed_rows: 0,
            period_start: None,
            period_end: None,
            error_summary: None,
            created_at: Utc::now(),
            completed_at: None,
        };
        self.ledger.create_job(&job)?;

        let outcome = self.process_workbook(workbook, filename, &upload_id, &options);

        if let Err(e) = self.finalize(&upload_id, &outcome) {
            // 台账落账失败不掩盖业务结果
            error!(upload_id = %upload_id, error = %e, "台账落账失败");
        }

        match &outcome {
            Ok(summary) => {
                info!(
                    upload_id = %upload_id,
                    processed = summary.processed_rows,
                    "工作簿摄取完成"
                );
            }
            Err(err) => {
                warn!(upload_id = %upload_id, error = %err, "工作簿摄取失败");
            }
        }
        outcome
    }

    async fn batch_ingest<P: AsRef<Path> + Send + Sync>(
        &self,
        file_paths: Vec<P>,
        options: UploadOptions,
    ) -> Vec<Result<IngestSummary, String>> {
        use futures::future::join_all;

        info!(count = file_paths.len(), "开始批量摄取");

        let tasks = file_paths.into_iter().map(|path| {
            let path_str = path.as_ref().display().to_string();
            let options = options.clone();
            async move {
                match self.ingest_file(path, options).await {
                    Ok(summary) => Ok(summary),
                    Err(e) => Err(format!("文件 {} 摄取失败: {}", path_str, e)),
                }
            }
        });

        let results = join_all(tasks).await;

        info!(
            total = results.len(),
            success = results.iter().filter(|r| r.is_ok()).count(),
            failed = results.iter().filter(|r| r.is_err()).count(),
            "批量摄取完成"
        );
        results
    }
}
