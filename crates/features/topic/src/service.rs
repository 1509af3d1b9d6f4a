use crate::error::TopicError;
use crate::model::{
    CreateTopicRequest, ReviewTopicRequest, TopicFilter, TopicRecord, TopicValidation,
    UpdateTopicRequest, ValidateTopicRequest,
};
use crate::repository::{TopicQuery, TopicRepository};
use crate::rules::{
    ensure_capacity, ensure_distinct_mentors, ensure_editable, normalize_title, review_note,
    title_key, topic_code,
};
use crate::validator::TopicValidator;
use std::sync::Arc;
use thesis_event_bus::EventBus;
use thesis_identity::{CurrentUser, FORBIDDEN, UserService};
use thesis_kernel::domain::events::TopicReviewed;
use thesis_kernel::prelude::{Role, SettingKey, TopicStatus, safe_nanoid, timeline};
use thesis_period::PeriodService;
use thesis_settings::SettingsService;
use tracing::{info, instrument, warn};

const NOT_FOUND: &str = "Không tìm thấy đề tài";

#[derive(Debug, Clone)]
pub struct TopicService {
    repo: TopicRepository,
    users: UserService,
    settings: SettingsService,
    periods: PeriodService,
    events: EventBus,
    validator: Arc<dyn TopicValidator>,
}

impl TopicService {
    pub fn new(
        repo: TopicRepository,
        users: UserService,
        settings: SettingsService,
        periods: PeriodService,
        events: EventBus,
        validator: Arc<dyn TopicValidator>,
    ) -> Self {
        Self { repo, users, settings, periods, events, validator }
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn create(
        &self,
        actor: &CurrentUser,
        request: CreateTopicRequest,
    ) -> Result<TopicRecord, TopicError> {
        let title_vi = normalize_title(&request.title_vi, "Tên đề tài tiếng Việt")?;
        let title_en = normalize_title(&request.title_en, "Tên đề tài tiếng Anh")?;
        let period = self.periods.require_active(&request.period_id).await?;

        let main_mentor = match actor.role {
            Role::Lecturer => match request.main_mentor_id {
                Some(id) if id != actor.id => {
                    return Err(TopicError::Forbidden {
                        message: "Giảng viên chỉ có thể đăng ký đề tài do chính mình hướng dẫn"
                            .into(),
                        context: None,
                    });
                },
                _ => actor.id.clone(),
            },
            _ => request.main_mentor_id.ok_or_else(|| TopicError::Validation {
                message: "Vui lòng chọn giảng viên hướng dẫn chính".into(),
                context: None,
            })?,
        };
        self.users.require_role(&main_mentor, Role::Lecturer).await?;

        let sub_mentor = self.sub_mentor(&main_mentor, request.sub_mentor_id).await?;
        let max_students = match request.max_students {
            Some(value) => value,
            None => u32::try_from(self.settings.limit(SettingKey::MaxGroupMembers).await?)
                .unwrap_or(u32::MAX),
        };
        self.ensure_capacity(max_students).await?;
        self.ensure_mentor_quota(&period.semester, &main_mentor, "").await?;

        let key = title_key(&title_vi);
        self.ensure_title_free(&period.semester, &key, "").await?;

        let sequence = self.repo.next_sequence(&period.semester).await?;
        let now = timeline::format(timeline::now());
        let record = TopicRecord {
            uid: safe_nanoid!(),
            code: topic_code(&period.semester, sequence),
            title_vi,
            title_en,
            title_key: key,
            description: clean(request.description),
            semester: period.semester,
            period_id: period.uid,
            main_mentor_id: main_mentor,
            sub_mentor_id: sub_mentor,
            max_students,
            status: TopicStatus::Pending,
            review_note: None,
            reviewed_by: None,
            reviewed_at: None,
            group_id: None,
            created_by: actor.id.clone(),
            created_at: now.clone(),
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };
        self.repo.insert(&record).await?;

        info!(topic = %record.uid, code = %record.code, "Topic registered");
        Ok(record)
    }

    pub async fn list(&self, filter: TopicFilter) -> Result<Vec<TopicRecord>, TopicError> {
        let query = TopicQuery {
            semester: filter.semester.map(|s| s.trim().to_uppercase()),
            period_id: filter.period_id,
            status: filter.status,
            mentor_id: filter.mentor_id,
        };
        Ok(self.repo.list(query).await?)
    }

    pub async fn get(&self, id: &str) -> Result<TopicRecord, TopicError> {
        self.repo.find(id).await?.ok_or_else(|| TopicError::NotFound {
            message: NOT_FOUND.into(),
            context: Some(id.to_owned().into()),
        })
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: &str,
        request: UpdateTopicRequest,
    ) -> Result<TopicRecord, TopicError> {
        let mut record = self.get(id).await?;
        ensure_owner(actor, &record)?;
        ensure_editable(record.status)?;

        if let Some(main) = request.main_mentor_id.filter(|m| *m != record.main_mentor_id) {
            if !actor.is_staff() {
                return Err(TopicError::Forbidden { message: FORBIDDEN.into(), context: None });
            }
            self.users.require_role(&main, Role::Lecturer).await?;
            self.ensure_mentor_quota(&record.semester, &main, &record.uid).await?;
            record.main_mentor_id = main;
        }
        match request.sub_mentor_id {
            Some(sub) if sub.trim().is_empty() => record.sub_mentor_id = None,
            Some(sub) => {
                record.sub_mentor_id = self.sub_mentor(&record.main_mentor_id, Some(sub)).await?;
            },
            None => ensure_distinct_mentors(
                &record.main_mentor_id,
                record.sub_mentor_id.as_deref(),
            )?,
        }

        if let Some(title) = request.title_vi.as_deref() {
            let title = normalize_title(title, "Tên đề tài tiếng Việt")?;
            let key = title_key(&title);
            if key != record.title_key {
                self.ensure_title_free(&record.semester, &key, &record.uid).await?;
            }
            record.title_vi = title;
            record.title_key = key;
        }
        if let Some(title) = request.title_en.as_deref() {
            record.title_en = normalize_title(title, "Tên đề tài tiếng Anh")?;
        }
        if request.description.is_some() {
            record.description = clean(request.description);
        }
        if let Some(max_students) = request.max_students {
            self.ensure_capacity(max_students).await?;
            record.max_students = max_students;
        }

        if record.status == TopicStatus::NeedsRevision {
            record.status = TopicStatus::Pending;
        }
        record.updated_at = timeline::format(timeline::now());
        self.repo.update(&record).await?;

        info!(topic = %record.uid, status = %record.status, "Topic updated");
        Ok(record)
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id, status = %request.status))]
    pub async fn review(
        &self,
        actor: &CurrentUser,
        id: &str,
        request: ReviewTopicRequest,
    ) -> Result<TopicRecord, TopicError> {
        let mut record = self.get(id).await?;
        if record.group_id.is_some() {
            return Err(TopicError::Conflict {
                message: "Đề tài đã được gán cho nhóm, không thể duyệt lại".into(),
                context: Some(record.uid.into()),
            });
        }
        let note = review_note(request.status, request.note.as_deref())?;

        let now = timeline::format(timeline::now());
        record.status = request.status;
        record.review_note = note;
        record.reviewed_by = Some(actor.id.clone());
        record.reviewed_at = Some(now.clone());
        record.updated_at = now;
        self.repo.update(&record).await?;

        info!(topic = %record.uid, "Topic reviewed");
        let mut recipients = vec![record.created_by.clone()];
        if record.main_mentor_id != record.created_by {
            recipients.push(record.main_mentor_id.clone());
        }
        let event = TopicReviewed {
            topic_id: record.uid.clone(),
            topic_code: record.code.clone(),
            title: record.title_vi.clone(),
            status: record.status,
            note: record.review_note.clone(),
            recipients,
        };
        if let Err(err) = self.events.publish(event) {
            warn!(error = %err, "Failed to publish TopicReviewed");
        }
        Ok(record)
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete(&self, actor: &CurrentUser, id: &str) -> Result<(), TopicError> {
        let record = self.get(id).await?;
        ensure_owner(actor, &record)?;
        if record.group_id.is_some() {
            return Err(TopicError::Conflict {
                message: "Không thể xóa đề tài đã được gán cho nhóm".into(),
                context: Some(record.uid.into()),
            });
        }

        self.repo.soft_delete(&record.uid, timeline::format(timeline::now())).await?;
        info!(topic = %record.uid, "Topic deleted");
        Ok(())
    }

    pub fn validate(&self, request: &ValidateTopicRequest) -> Result<TopicValidation, TopicError> {
        normalize_title(&request.title_vi, "Tên đề tài tiếng Việt")?;
        Ok(self.validator.validate(request))
    }

    async fn sub_mentor(
        &self,
        main: &str,
        sub: Option<String>,
    ) -> Result<Option<String>, TopicError> {
        let Some(sub) = sub.filter(|s| !s.trim().is_empty()) else {
            return Ok(None);
        };
        ensure_distinct_mentors(main, Some(&sub))?;
        self.users.require_role(&sub, Role::Lecturer).await?;
        Ok(Some(sub))
    }

    async fn ensure_capacity(&self, max_students: u32) -> Result<(), TopicError> {
        let min = self.settings.limit(SettingKey::MinGroupMembers).await?;
        let max = self.settings.limit(SettingKey::MaxGroupMembers).await?;
        ensure_capacity(max_students, min, max)
    }

    async fn ensure_mentor_quota(
        &self,
        semester: &str,
        mentor: &str,
        exclude: &str,
    ) -> Result<(), TopicError> {
        let quota = self.settings.limit(SettingKey::MaxTopicsPerLecturer).await?;
        if self.repo.mentor_load(semester, mentor, exclude).await? >= quota {
            return Err(TopicError::Conflict {
                message: format!(
                    "Giảng viên đã đạt số lượng đề tài tối đa ({quota}) trong học kỳ {semester}"
                )
                .into(),
                context: Some(mentor.to_owned().into()),
            });
        }
        Ok(())
    }

    async fn ensure_title_free(
        &self,
        semester: &str,
        key: &str,
        exclude: &str,
    ) -> Result<(), TopicError> {
        if self.repo.title_taken(semester, key, exclude).await? {
            return Err(TopicError::Conflict {
                message: "Tên đề tài đã tồn tại trong học kỳ".into(),
                context: None,
            });
        }
        Ok(())
    }
}

/// Creator, main mentor or staff.
fn ensure_owner(actor: &CurrentUser, record: &TopicRecord) -> Result<(), TopicError> {
    if actor.is_staff() || actor.id == record.created_by || actor.id == record.main_mentor_id {
        Ok(())
    } else {
        Err(TopicError::Forbidden { message: FORBIDDEN.into(), context: None })
    }
}

fn clean(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty())
}
