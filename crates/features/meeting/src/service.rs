use crate::error::MeetingError;
use crate::model::{
    CreateMeetingRequest, MeetingFilter, MeetingRecord, MeetingView, UpdateMeetingRequest,
};
use crate::repository::{MeetingQuery, MeetingRepository};
use crate::rules::{duration, ensure_future, ensure_no_clash, status_of};
use thesis_event_bus::EventBus;
use thesis_group::{GroupDetails, GroupFilter, GroupService};
use thesis_identity::{CurrentUser, FORBIDDEN};
use thesis_kernel::domain::events::MeetingScheduled;
use thesis_kernel::prelude::{Role, TimelineStatus, Window, safe_nanoid, timeline};
use tracing::{info, instrument, warn};

const NOT_FOUND: &str = "Không tìm thấy lịch họp";

#[derive(Debug, Clone)]
pub struct MeetingService {
    repo: MeetingRepository,
    groups: GroupService,
    events: EventBus,
}

impl MeetingService {
    pub const fn new(repo: MeetingRepository, groups: GroupService, events: EventBus) -> Self {
        Self { repo, groups, events }
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id, group = %request.group_id))]
    pub async fn create(
        &self,
        actor: &CurrentUser,
        request: CreateMeetingRequest,
    ) -> Result<MeetingRecord, MeetingError> {
        let group = self.groups.get(&request.group_id).await?;
        ensure_mentor_or_staff(actor, &group)?;

        let mentor_id = match (request.mentor_id, actor.role) {
            (Some(id), _) => id,
            (None, Role::Lecturer) => actor.id.clone(),
            (None, _) => {
                return Err(MeetingError::Validation {
                    message: "Vui lòng chọn giảng viên hướng dẫn".into(),
                    context: None,
                });
            },
        };
        if !group.is_mentor(&mentor_id) {
            return Err(MeetingError::Validation {
                message: format!("Giảng viên không hướng dẫn nhóm {}", group.group.code).into(),
                context: Some(mentor_id.into()),
            });
        }

        let minutes = duration(request.duration_minutes)?;
        let start = timeline::parse(&request.start_time)?;
        let now = timeline::now();
        ensure_future(start, now)?;
        let slot = Window::from_duration(start, minutes)?;
        self.ensure_free(&group.group.uid, &mentor_id, &slot, None).await?;

        let stamp = timeline::format(now);
        let record = MeetingRecord {
            uid: safe_nanoid!(),
            group_id: group.group.uid,
            mentor_id,
            semester: group.group.semester,
            start_time: timeline::format(slot.start),
            end_time: timeline::format(slot.end),
            duration_minutes: minutes,
            location: clean(request.location),
            agenda: clean(request.agenda),
            notes: None,
            created_by: actor.id.clone(),
            created_at: stamp.clone(),
            updated_at: stamp,
            is_deleted: false,
            deleted_at: None,
        };
        self.repo.insert(&record).await?;

        info!(meeting = %record.uid, start = %record.start_time, "Meeting scheduled");
        self.publish(&record);
        Ok(record)
    }

    /// Students only ever see the meetings of their own groups.
    pub async fn list(
        &self,
        actor: &CurrentUser,
        filter: MeetingFilter,
    ) -> Result<Vec<MeetingRecord>, MeetingError> {
        let groups = if actor.role == Role::Student {
            let own = self
                .groups
                .list(GroupFilter { student_id: Some(actor.id.clone()), ..GroupFilter::default() })
                .await?;
            Some(own.into_iter().map(|details| details.group.uid).collect())
        } else {
            None
        };

        let query = MeetingQuery { group: filter.group_id, mentor: filter.mentor_id, groups };
        let meetings = self.repo.list(query).await?;
        let now = timeline::now();
        Ok(meetings
            .into_iter()
            .filter(|meeting| filter.status.is_none_or(|status| status_of(meeting, now) == status))
            .collect())
    }

    pub async fn get(&self, actor: &CurrentUser, id: &str) -> Result<MeetingRecord, MeetingError> {
        let record = self.find(id).await?;
        if actor.role == Role::Student {
            let group = self.groups.get(&record.group_id).await?;
            if group.member(&actor.id).is_none() {
                return Err(MeetingError::Forbidden { message: FORBIDDEN.into(), context: None });
            }
        }
        Ok(record)
    }

    /// Reschedules or edits a meeting that has not started. Once it starts,
    /// only its mentor may still change the notes.
    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: &str,
        request: UpdateMeetingRequest,
    ) -> Result<MeetingRecord, MeetingError> {
        let mut record = self.find(id).await?;
        let group = self.groups.get(&record.group_id).await?;
        ensure_mentor_or_staff(actor, &group)?;

        let now = timeline::now();
        if status_of(&record, now) != TimelineStatus::Upcoming {
            if !request.notes_only() {
                return Err(MeetingError::Validation {
                    message: "Cuộc họp đã bắt đầu, chỉ có thể cập nhật ghi chú".into(),
                    context: None,
                });
            }
            if actor.id != record.mentor_id {
                return Err(MeetingError::Forbidden {
                    message: "Chỉ giảng viên chủ trì được cập nhật ghi chú".into(),
                    context: None,
                });
            }
        }

        if request.start_time.is_some() || request.duration_minutes.is_some() {
            let start = match request.start_time.as_deref() {
                Some(raw) => timeline::parse(raw)?,
                None => timeline::parse(&record.start_time)?,
            };
            let minutes = duration(request.duration_minutes.or(Some(record.duration_minutes)))?;
            ensure_future(start, now)?;
            let slot = Window::from_duration(start, minutes)?;
            self.ensure_free(&record.group_id, &record.mentor_id, &slot, Some(&record.uid)).await?;

            record.start_time = timeline::format(slot.start);
            record.end_time = timeline::format(slot.end);
            record.duration_minutes = minutes;
        }
        if request.location.is_some() {
            record.location = clean(request.location);
        }
        if request.agenda.is_some() {
            record.agenda = clean(request.agenda);
        }
        if request.notes.is_some() {
            record.notes = clean(request.notes);
        }
        record.updated_at = timeline::format(now);
        self.repo.update(&record).await?;

        info!(meeting = %record.uid, "Meeting updated");
        Ok(record)
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete(&self, actor: &CurrentUser, id: &str) -> Result<(), MeetingError> {
        let record = self.find(id).await?;
        let group = self.groups.get(&record.group_id).await?;
        ensure_mentor_or_staff(actor, &group)?;

        let now = timeline::now();
        if status_of(&record, now) != TimelineStatus::Upcoming {
            return Err(MeetingError::Validation {
                message: "Không thể xóa cuộc họp đã bắt đầu".into(),
                context: None,
            });
        }
        self.repo.soft_delete(&record.uid, timeline::format(now)).await?;
        info!(meeting = %record.uid, "Meeting cancelled");
        Ok(())
    }

    async fn find(&self, id: &str) -> Result<MeetingRecord, MeetingError> {
        self.repo.find(id).await?.ok_or_else(|| MeetingError::NotFound {
            message: NOT_FOUND.into(),
            context: Some(id.to_owned().into()),
        })
    }

    async fn ensure_free(
        &self,
        group: &str,
        mentor: &str,
        slot: &Window,
        exclude: Option<&str>,
    ) -> Result<(), MeetingError> {
        let candidates = self
            .repo
            .overlapping(
                group,
                mentor,
                timeline::format(slot.start),
                timeline::format(slot.end),
                exclude,
            )
            .await?;
        ensure_no_clash(slot, group, &candidates)
    }

    fn publish(&self, record: &MeetingRecord) {
        let event = MeetingScheduled {
            meeting_id: record.uid.clone(),
            group_id: record.group_id.clone(),
            mentor_id: record.mentor_id.clone(),
            start_time: record.start_time.clone(),
            location: record.location.clone(),
        };
        if let Err(err) = self.events.publish(event) {
            warn!(error = %err, "Failed to publish MeetingScheduled");
        }
    }
}

fn ensure_mentor_or_staff(actor: &CurrentUser, group: &GroupDetails) -> Result<(), MeetingError> {
    if actor.is_staff() || group.is_mentor(&actor.id) {
        Ok(())
    } else {
        Err(MeetingError::Forbidden { message: FORBIDDEN.into(), context: None })
    }
}

fn clean(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty())
}

impl From<MeetingRecord> for MeetingView {
    fn from(record: MeetingRecord) -> Self {
        let status = status_of(&record, timeline::now());
        Self {
            id: record.uid,
            group_id: record.group_id,
            mentor_id: record.mentor_id,
            semester: record.semester,
            start_time: record.start_time,
            end_time: record.end_time,
            duration_minutes: record.duration_minutes,
            location: record.location,
            agenda: record.agenda,
            notes: record.notes,
            status,
            created_by: record.created_by,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
