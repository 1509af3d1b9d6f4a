use crate::error::CouncilError;
use crate::model::{
    AddCouncilMemberRequest, AssignGroupRequest, AssignmentRecord, AssignmentView, CouncilDetails,
    CouncilFilter, CouncilMemberRecord, CouncilMemberView, CouncilRecord, CouncilView,
    CreateCouncilRequest, UpdateCouncilRequest,
};
use crate::repository::CouncilRepository;
use crate::rules::{
    SLOT_MINUTES, council_code, ensure_mutable, ensure_seat_free, ensure_slot, normalize_name,
    slot_of, status_of, window_of,
};
use thesis_event_bus::EventBus;
use thesis_group::GroupService;
use thesis_identity::{CurrentUser, UserService};
use thesis_kernel::domain::events::{CouncilMemberAdded, GroupAssignedToCouncil};
use thesis_kernel::prelude::{CouncilRole, Role, SettingKey, Window, safe_nanoid, timeline};
use thesis_period::PeriodService;
use thesis_settings::SettingsService;
use tracing::{info, instrument, warn};

const NOT_FOUND: &str = "Không tìm thấy hội đồng";

#[derive(Debug, Clone)]
pub struct CouncilService {
    repo: CouncilRepository,
    users: UserService,
    settings: SettingsService,
    periods: PeriodService,
    groups: GroupService,
    events: EventBus,
}

impl CouncilService {
    pub const fn new(
        repo: CouncilRepository,
        users: UserService,
        settings: SettingsService,
        periods: PeriodService,
        groups: GroupService,
        events: EventBus,
    ) -> Self {
        Self { repo, users, settings, periods, groups, events }
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id, kind = %request.kind))]
    pub async fn create(
        &self,
        actor: &CurrentUser,
        request: CreateCouncilRequest,
    ) -> Result<CouncilDetails, CouncilError> {
        let name = normalize_name(&request.name)?;
        let period = self.periods.get(&request.period_id).await?;
        let window =
            Window::new(timeline::parse(&request.start_time)?, timeline::parse(&request.end_time)?)?;

        let sequence = self.repo.next_sequence(&period.semester).await?;
        let now = timeline::format(timeline::now());
        let council = CouncilRecord {
            uid: safe_nanoid!(),
            code: council_code(&period.semester, sequence),
            name,
            kind: request.kind,
            semester: period.semester,
            period_id: period.uid,
            start_time: timeline::format(window.start),
            end_time: timeline::format(window.end),
            location: clean(request.location),
            created_by: actor.id.clone(),
            created_at: now.clone(),
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        };
        self.repo.insert(&council).await?;

        info!(council = %council.uid, code = %council.code, "Council created");
        Ok(CouncilDetails { council, members: Vec::new(), assignments: Vec::new() })
    }

    pub async fn list(&self, filter: CouncilFilter) -> Result<Vec<CouncilDetails>, CouncilError> {
        let semester = filter.semester.map(|s| s.trim().to_uppercase()).filter(|s| !s.is_empty());
        let councils =
            self.repo.list(semester, filter.kind, filter.period_id, filter.lecturer_id).await?;
        if councils.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = councils.iter().map(|c| c.uid.clone()).collect();
        let members = self.repo.members(ids.clone()).await?;
        let assignments = self.repo.assignments(ids).await?;
        Ok(councils
            .into_iter()
            .map(|council| CouncilDetails {
                members: members.iter().filter(|m| m.council_id == council.uid).cloned().collect(),
                assignments: assignments
                    .iter()
                    .filter(|a| a.council_id == council.uid)
                    .cloned()
                    .collect(),
                council,
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<CouncilDetails, CouncilError> {
        let council = self.repo.find(id).await?.ok_or_else(|| CouncilError::NotFound {
            message: NOT_FOUND.into(),
            context: Some(id.to_owned().into()),
        })?;
        let members = self.repo.members(vec![council.uid.clone()]).await?;
        let assignments = self.repo.assignments(vec![council.uid.clone()]).await?;
        Ok(CouncilDetails { council, members, assignments })
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn update(
        &self,
        actor: &CurrentUser,
        id: &str,
        request: UpdateCouncilRequest,
    ) -> Result<CouncilDetails, CouncilError> {
        let mut details = self.get(id).await?;
        let current = window_of(&details.council)?;
        ensure_mutable(current.status_at(timeline::now()))?;

        let start = request.start_time.as_deref().map(timeline::parse).transpose()?;
        let end = request.end_time.as_deref().map(timeline::parse).transpose()?;
        let window = Window::new(start.unwrap_or(current.start), end.unwrap_or(current.end))?;
        for assignment in &details.assignments {
            if !window.encloses(&slot_of(assignment)?) {
                return Err(CouncilError::Validation {
                    message: "Thời gian mới không bao gồm lịch bảo vệ đã xếp".into(),
                    context: Some(assignment.group_id.clone().into()),
                });
            }
        }

        let council = &mut details.council;
        if let Some(name) = request.name.as_deref() {
            council.name = normalize_name(name)?;
        }
        if request.location.is_some() {
            council.location = clean(request.location);
        }
        council.start_time = timeline::format(window.start);
        council.end_time = timeline::format(window.end);
        council.updated_at = timeline::format(timeline::now());
        self.repo.update(council).await?;

        info!(council = %council.uid, "Council updated");
        Ok(details)
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id, role = %request.role))]
    pub async fn add_member(
        &self,
        actor: &CurrentUser,
        id: &str,
        request: AddCouncilMemberRequest,
    ) -> Result<CouncilDetails, CouncilError> {
        let details = self.get(id).await?;
        ensure_mutable(status_of(&details.council, timeline::now()))?;
        let lecturer = self.users.require_role(&request.lecturer_id, Role::Lecturer).await?;

        if details.member(&lecturer.uid).is_some() {
            return Err(CouncilError::Conflict {
                message: "Giảng viên đã là thành viên của hội đồng".into(),
                context: Some(lecturer.uid.into()),
            });
        }
        let max = self.settings.limit(SettingKey::MaxCouncilMembers).await?;
        if i64::try_from(details.members.len()).unwrap_or(i64::MAX) >= max {
            return Err(CouncilError::Conflict {
                message: format!("Hội đồng đã đủ {max} thành viên").into(),
                context: None,
            });
        }
        ensure_seat_free(&details, request.role)?;

        let quota = self.settings.limit(SettingKey::MaxCouncilsPerLecturer).await?;
        if self.repo.lecturer_load(&lecturer.uid, &details.council.semester).await? >= quota {
            return Err(CouncilError::Conflict {
                message: format!("Giảng viên đã tham gia tối đa {quota} hội đồng trong học kỳ")
                    .into(),
                context: Some(lecturer.uid.into()),
            });
        }
        for assignment in &details.assignments {
            let group = self.groups.get(&assignment.group_id).await?;
            if group.is_mentor(&lecturer.uid) {
                return Err(CouncilError::Conflict {
                    message: format!(
                        "Giảng viên đang hướng dẫn nhóm {} được phân cho hội đồng",
                        group.group.code
                    )
                    .into(),
                    context: None,
                });
            }
        }

        let member = CouncilMemberRecord {
            uid: safe_nanoid!(),
            council_id: details.council.uid.clone(),
            lecturer_id: lecturer.uid,
            semester: details.council.semester.clone(),
            role: request.role,
            added_at: timeline::format(timeline::now()),
            is_deleted: false,
            deleted_at: None,
        };
        self.repo.insert_member(&member).await?;

        info!(council = %details.council.uid, lecturer = %member.lecturer_id, "Council member added");
        self.publish(CouncilMemberAdded {
            council_id: details.council.uid.clone(),
            council_name: details.council.name.clone(),
            lecturer_id: member.lecturer_id,
            role: member.role,
        });
        self.get(&details.council.uid).await
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn remove_member(
        &self,
        actor: &CurrentUser,
        id: &str,
        lecturer_id: &str,
    ) -> Result<CouncilDetails, CouncilError> {
        let details = self.get(id).await?;
        ensure_mutable(status_of(&details.council, timeline::now()))?;
        let member = details.member(lecturer_id).ok_or_else(|| CouncilError::NotFound {
            message: "Giảng viên không thuộc hội đồng".into(),
            context: Some(lecturer_id.to_owned().into()),
        })?;

        self.repo.remove_member(&member.uid, timeline::format(timeline::now())).await?;
        info!(council = %details.council.uid, lecturer = %lecturer_id, "Council member removed");
        self.get(&details.council.uid).await
    }

    /// Books a 60-minute defense slot for a group.
    #[instrument(skip(self, actor, request), fields(actor = %actor.id, group = %request.group_id))]
    pub async fn assign_group(
        &self,
        actor: &CurrentUser,
        id: &str,
        request: AssignGroupRequest,
    ) -> Result<CouncilDetails, CouncilError> {
        let details = self.get(id).await?;
        let council_window = window_of(&details.council)?;
        ensure_mutable(council_window.status_at(timeline::now()))?;

        let min = self.settings.limit(SettingKey::MinCouncilMembers).await?;
        if i64::try_from(details.members.len()).unwrap_or(i64::MAX) < min
            || !details.has_role(CouncilRole::Chairman)
        {
            return Err(CouncilError::Validation {
                message: format!("Hội đồng cần ít nhất {min} thành viên, trong đó có chủ tịch")
                    .into(),
                context: None,
            });
        }

        let group = self.groups.get(&request.group_id).await?;
        if group.group.semester != details.council.semester {
            return Err(CouncilError::Validation {
                message: "Nhóm và hội đồng phải thuộc cùng học kỳ".into(),
                context: None,
            });
        }
        if group.group.topic_id.is_none() {
            return Err(CouncilError::Validation {
                message: "Nhóm chưa có đề tài".into(),
                context: Some(group.group.uid.into()),
            });
        }
        if let Some(member) = details.members.iter().find(|m| group.is_mentor(&m.lecturer_id)) {
            return Err(CouncilError::Conflict {
                message: "Thành viên hội đồng không được là giảng viên hướng dẫn của nhóm".into(),
                context: Some(member.lecturer_id.clone().into()),
            });
        }
        if self.repo.council_of_group(&group.group.uid, details.council.kind).await?.is_some() {
            return Err(CouncilError::Conflict {
                message: format!(
                    "Nhóm đã được phân vào một hội đồng {} khác",
                    details.council.kind
                )
                .into(),
                context: Some(group.group.uid.into()),
            });
        }

        let slot = Window::from_duration(timeline::parse(&request.defense_at)?, SLOT_MINUTES)?;
        ensure_slot(&council_window, &slot, &details.assignments)?;

        let assignment = AssignmentRecord {
            uid: safe_nanoid!(),
            council_id: details.council.uid.clone(),
            group_id: group.group.uid.clone(),
            kind: details.council.kind,
            semester: details.council.semester.clone(),
            defense_at: timeline::format(slot.start),
            created_at: timeline::format(timeline::now()),
            is_deleted: false,
            deleted_at: None,
        };
        self.repo.insert_assignment(&assignment).await?;

        info!(council = %details.council.uid, group = %assignment.group_id, "Group assigned to council");
        self.publish(GroupAssignedToCouncil {
            council_id: details.council.uid.clone(),
            council_name: details.council.name.clone(),
            group_id: group.group.uid,
            group_code: group.group.code,
            defense_at: assignment.defense_at,
        });
        self.get(&details.council.uid).await
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn unassign_group(
        &self,
        actor: &CurrentUser,
        id: &str,
        group_id: &str,
    ) -> Result<CouncilDetails, CouncilError> {
        let details = self.get(id).await?;
        ensure_mutable(status_of(&details.council, timeline::now()))?;
        let assignment = details.assignment(group_id).ok_or_else(|| CouncilError::NotFound {
            message: "Nhóm không thuộc hội đồng".into(),
            context: Some(group_id.to_owned().into()),
        })?;

        self.repo.remove_assignment(&assignment.uid, timeline::format(timeline::now())).await?;
        info!(council = %details.council.uid, group = %group_id, "Group removed from council");
        self.get(&details.council.uid).await
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete(&self, actor: &CurrentUser, id: &str) -> Result<(), CouncilError> {
        let details = self.get(id).await?;
        self.repo.delete(&details.council.uid, timeline::format(timeline::now())).await?;
        info!(council = %details.council.uid, "Council deleted");
        Ok(())
    }

    fn publish<E: Send + Sync + 'static>(&self, event: E) {
        if let Err(err) = self.events.publish(event) {
            warn!(error = %err, "Failed to publish council event");
        }
    }
}

impl From<CouncilDetails> for CouncilView {
    fn from(details: CouncilDetails) -> Self {
        let status = status_of(&details.council, timeline::now());
        let CouncilDetails { council, members, assignments } = details;
        Self {
            id: council.uid,
            code: council.code,
            name: council.name,
            kind: council.kind,
            semester: council.semester,
            period_id: council.period_id,
            start_time: council.start_time,
            end_time: council.end_time,
            location: council.location,
            status,
            members: members
                .into_iter()
                .map(|m| CouncilMemberView { lecturer_id: m.lecturer_id, role: m.role, added_at: m.added_at })
                .collect(),
            assignments: assignments
                .into_iter()
                .map(|a| AssignmentView { group_id: a.group_id, defense_at: a.defense_at })
                .collect(),
            created_by: council.created_by,
            created_at: council.created_at,
            updated_at: council.updated_at,
        }
    }
}

fn clean(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_owned()).filter(|t| !t.is_empty())
}
