use crate::error::DecisionError;
use crate::model::{CreateDecisionRequest, DecisionFilter, DecisionRecord, UpdateDecisionRequest};
use crate::repository::DecisionRepository;
use crate::rules::{ensure_signed, file_url, normalize_semester, number_key, required};
use thesis_identity::CurrentUser;
use thesis_kernel::prelude::{safe_nanoid, timeline};
use tracing::{info, instrument};

const NOT_FOUND: &str = "Không tìm thấy quyết định";

#[derive(Debug, Clone)]
pub struct DecisionService {
    repo: DecisionRepository,
}

impl DecisionService {
    pub const fn new(repo: DecisionRepository) -> Self {
        Self { repo }
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id, kind = %request.kind))]
    pub async fn create(
        &self,
        actor: &CurrentUser,
        request: CreateDecisionRequest,
    ) -> Result<DecisionRecord, DecisionError> {
        let number = required(&request.number, "Số quyết định")?;
        let key = number_key(&number);
        self.ensure_number_free(&key, None).await?;

        let now = timeline::now();
        let signed = timeline::parse(&request.signed_date)?;
        ensure_signed(signed, now)?;

        let stamp = timeline::format(now);
        let record = DecisionRecord {
            uid: safe_nanoid!(),
            number,
            number_key: key,
            title: required(&request.title, "Tiêu đề")?,
            kind: request.kind,
            semester: normalize_semester(&request.semester)?,
            signed_date: timeline::format(signed),
            signer: required(&request.signer, "Người ký")?,
            file_url: file_url(request.file_url)?,
            note: clean(request.note),
            created_by: actor.id.clone(),
            created_at: stamp.clone(),
            updated_at: stamp,
            is_deleted: false,
            deleted_at: None,
        };
        self.repo.insert(&record).await?;

        info!(decision = %record.uid, number = %record.number, "Decision recorded");
        Ok(record)
    }

    pub async fn list(&self, filter: DecisionFilter) -> Result<Vec<DecisionRecord>, DecisionError> {
        let semester = filter.semester.as_deref().map(normalize_semester).transpose()?;
        Ok(self.repo.list(semester, filter.kind).await?)
    }

    pub async fn get(&self, id: &str) -> Result<DecisionRecord, DecisionError> {
        self.repo.find(id).await?.ok_or_else(|| DecisionError::NotFound {
            message: NOT_FOUND.into(),
            context: Some(id.to_owned().into()),
        })
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: &str,
        request: UpdateDecisionRequest,
    ) -> Result<DecisionRecord, DecisionError> {
        let mut record = self.get(id).await?;
        let now = timeline::now();

        if let Some(raw) = request.number.as_deref() {
            let number = required(raw, "Số quyết định")?;
            let key = number_key(&number);
            if key != record.number_key {
                self.ensure_number_free(&key, Some(&record.uid)).await?;
            }
            record.number = number;
            record.number_key = key;
        }
        if let Some(title) = request.title.as_deref() {
            record.title = required(title, "Tiêu đề")?;
        }
        if let Some(kind) = request.kind {
            record.kind = kind;
        }
        if let Some(semester) = request.semester.as_deref() {
            record.semester = normalize_semester(semester)?;
        }
        if let Some(raw) = request.signed_date.as_deref() {
            let signed = timeline::parse(raw)?;
            ensure_signed(signed, now)?;
            record.signed_date = timeline::format(signed);
        }
        if let Some(signer) = request.signer.as_deref() {
            record.signer = required(signer, "Người ký")?;
        }
        if request.file_url.is_some() {
            record.file_url = file_url(request.file_url)?;
        }
        if request.note.is_some() {
            record.note = clean(request.note);
        }
        record.updated_at = timeline::format(now);
        self.repo.update(&record).await?;

        info!(decision = %record.uid, "Decision updated");
        Ok(record)
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete(&self, actor: &CurrentUser, id: &str) -> Result<(), DecisionError> {
        let record = self.get(id).await?;
        self.repo.soft_delete(&record.uid, timeline::format(timeline::now())).await?;
        info!(decision = %record.uid, "Decision deleted");
        Ok(())
    }

    async fn ensure_number_free(&self, key: &str, exclude: Option<&str>) -> Result<(), DecisionError> {
        if self.repo.number_taken(key, exclude).await? {
            return Err(DecisionError::Conflict {
                message: "Số quyết định đã tồn tại".into(),
                context: Some(key.to_owned().into()),
            });
        }
        Ok(())
    }
}

fn clean(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty())
}
