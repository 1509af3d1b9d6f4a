use crate::error::PeriodError;
use crate::model::{CreatePeriodRequest, PeriodFilter, PeriodRecord, PeriodView, UpdatePeriodRequest};
use crate::repository::PeriodRepository;
use crate::rules::{
    ensure_editable, ensure_no_clash, normalize_semester, status_of, validate_round, window_of,
};
use thesis_identity::CurrentUser;
use thesis_kernel::prelude::{TimelineStatus, Window, safe_nanoid, timeline};
use tracing::{info, instrument};

const NOT_FOUND: &str = "Không tìm thấy đợt nộp";

#[derive(Debug, Clone)]
pub struct PeriodService {
    repo: PeriodRepository,
}

impl PeriodService {
    pub const fn new(repo: PeriodRepository) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn create(
        &self,
        actor: &CurrentUser,
        request: CreatePeriodRequest,
    ) -> Result<PeriodView, PeriodError> {
        let semester = normalize_semester(&request.semester)?;
        let round = validate_round(request.round_number)?;
        let window =
            Window::new(timeline::parse(&request.start_date)?, timeline::parse_end(&request.end_date)?)?;

        let siblings = self.repo.siblings(&semester, "").await?;
        ensure_no_clash(&semester, round, &window, &siblings)?;

        let now = timeline::format(timeline::now());
        let record = PeriodRecord {
            uid: safe_nanoid!(),
            semester,
            round_number: round,
            start_date: timeline::format(window.start),
            end_date: timeline::format(window.end),
            description: clean(request.description),
            created_by: actor.id.clone(),
            created_at: now.clone(),
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };
        self.repo.insert(&record).await?;

        info!(period = %record.uid, semester = %record.semester, round, "Submission period created");
        Ok(view(record))
    }

    pub async fn list(&self, filter: &PeriodFilter) -> Result<Vec<PeriodView>, PeriodError> {
        let semester = filter.semester.as_deref().map(normalize_semester).transpose()?;
        let records = self.repo.list(semester).await?;
        Ok(records
            .into_iter()
            .map(view)
            .filter(|v| filter.status.is_none_or(|status| v.status == status))
            .collect())
    }

    /// Periods open right now.
    pub async fn active(&self) -> Result<Vec<PeriodView>, PeriodError> {
        let records = self.repo.active_at(timeline::format(timeline::now())).await?;
        Ok(records.into_iter().map(view).collect())
    }

    pub async fn get(&self, id: &str) -> Result<PeriodRecord, PeriodError> {
        self.repo.find(id).await?.ok_or_else(|| PeriodError::NotFound {
            message: NOT_FOUND.into(),
            context: Some(id.to_owned().into()),
        })
    }

    pub async fn view(&self, id: &str) -> Result<PeriodView, PeriodError> {
        self.get(id).await.map(view)
    }

    /// The period `id`, which must be accepting submissions now.
    pub async fn require_active(&self, id: &str) -> Result<PeriodRecord, PeriodError> {
        let record = self.get(id).await?;
        if status_of(&record, timeline::now()) != TimelineStatus::Active {
            return Err(PeriodError::Validation {
                message: "Đợt nộp không trong thời gian hoạt động".into(),
                context: Some(id.to_owned().into()),
            });
        }
        Ok(record)
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: &str,
        request: UpdatePeriodRequest,
    ) -> Result<PeriodView, PeriodError> {
        let mut record = self.get(id).await?;
        let current = window_of(&record)?;

        let start = request.start_date.as_deref().map(timeline::parse).transpose()?;
        let end = request.end_date.as_deref().map(timeline::parse_end).transpose()?;
        let window = Window::new(start.unwrap_or(current.start), end.unwrap_or(current.end))?;
        ensure_editable(current.status_at(timeline::now()), current.start, window.start)?;

        if let Some(semester) = request.semester.as_deref() {
            record.semester = normalize_semester(semester)?;
        }
        if let Some(round) = request.round_number {
            record.round_number = validate_round(round)?;
        }

        let siblings = self.repo.siblings(&record.semester, &record.uid).await?;
        ensure_no_clash(&record.semester, record.round_number, &window, &siblings)?;

        record.start_date = timeline::format(window.start);
        record.end_date = timeline::format(window.end);
        if request.description.is_some() {
            record.description = clean(request.description);
        }
        record.updated_at = timeline::format(timeline::now());
        self.repo.update(&record).await?;

        info!(period = %record.uid, "Submission period updated");
        Ok(view(record))
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete(&self, actor: &CurrentUser, id: &str) -> Result<(), PeriodError> {
        let record = self.get(id).await?;
        if self.repo.count_topics(&record.uid).await? > 0 {
            return Err(PeriodError::Conflict {
                message: "Không thể xóa đợt nộp đã có đề tài".into(),
                context: Some(record.uid.into()),
            });
        }

        self.repo.soft_delete(&record.uid, timeline::format(timeline::now())).await?;
        info!(period = %record.uid, "Submission period deleted");
        Ok(())
    }
}

fn view(record: PeriodRecord) -> PeriodView {
    let status = status_of(&record, timeline::now());
    PeriodView {
        id: record.uid,
        semester: record.semester,
        round_number: record.round_number,
        start_date: record.start_date,
        end_date: record.end_date,
        description: record.description,
        status,
        created_at: record.created_at,
    }
}

fn clean(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty())
}
