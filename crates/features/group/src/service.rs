use crate::error::GroupError;
use crate::model::{
    AddMemberRequest, AddMentorRequest, AssignTopicRequest, ChangeLeaderRequest,
    CreateGroupRequest, GroupDetails, GroupFilter, GroupRecord, MemberRecord, MentorRecord,
};
use crate::repository::GroupRepository;
use crate::rules::{
    ensure_member_count, ensure_mentor_seat, group_code, normalize_semester, successor,
};
use thesis_event_bus::EventBus;
use thesis_identity::{CurrentUser, FORBIDDEN, UserService};
use thesis_kernel::domain::events::{GroupMemberAdded, MentorAssigned};
use thesis_kernel::prelude::{MentorRole, Role, SettingKey, TopicStatus, safe_nanoid, timeline};
use thesis_settings::SettingsService;
use thesis_topic::TopicService;
use tracing::{info, instrument, warn};

const NOT_FOUND: &str = "Không tìm thấy nhóm";

#[derive(Debug, Clone)]
pub struct GroupService {
    repo: GroupRepository,
    users: UserService,
    settings: SettingsService,
    topics: TopicService,
    events: EventBus,
}

impl GroupService {
    pub const fn new(
        repo: GroupRepository,
        users: UserService,
        settings: SettingsService,
        topics: TopicService,
        events: EventBus,
    ) -> Self {
        Self { repo, users, settings, topics, events }
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn create(
        &self,
        actor: &CurrentUser,
        request: CreateGroupRequest,
    ) -> Result<GroupDetails, GroupError> {
        let semester = normalize_semester(&request.semester)?;
        if actor.role == Role::Student {
            self.ensure_student_free(&actor.id, &semester).await?;
        }

        let sequence = self.repo.next_sequence(&semester).await?;
        let code = group_code(&semester, sequence);
        let now = timeline::format(timeline::now());
        let group = GroupRecord {
            uid: safe_nanoid!(),
            name: request
                .name
                .map(|n| n.trim().to_owned())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| code.clone()),
            code,
            semester,
            topic_id: None,
            created_by: actor.id.clone(),
            created_at: now.clone(),
            updated_at: now.clone(),
            is_deleted: false,
            deleted_at: None,
        };

        let members = if actor.role == Role::Student {
            vec![MemberRecord {
                uid: safe_nanoid!(),
                group_id: group.uid.clone(),
                student_id: actor.id.clone(),
                semester: group.semester.clone(),
                is_leader: true,
                seq: 1,
                joined_at: now,
                is_deleted: false,
                deleted_at: None,
            }]
        } else {
            Vec::new()
        };
        self.repo.create(&group, members.clone()).await?;

        info!(group = %group.uid, code = %group.code, "Group created");
        Ok(GroupDetails { group, members, mentors: Vec::new() })
    }

    pub async fn list(&self, filter: GroupFilter) -> Result<Vec<GroupDetails>, GroupError> {
        let semester = filter.semester.as_deref().map(normalize_semester).transpose()?;
        let groups = self.repo.list(semester, filter.student_id, filter.mentor_id).await?;
        if groups.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<String> = groups.iter().map(|g| g.uid.clone()).collect();
        let mut members = self.repo.members(ids.clone()).await?;
        let mut mentors = self.repo.mentors(ids).await?;

        Ok(groups
            .into_iter()
            .map(|group| {
                let (own_members, rest): (Vec<_>, Vec<_>) =
                    members.drain(..).partition(|m| m.group_id == group.uid);
                members = rest;
                let (own_mentors, rest): (Vec<_>, Vec<_>) =
                    mentors.drain(..).partition(|m| m.group_id == group.uid);
                mentors = rest;
                GroupDetails { group, members: own_members, mentors: own_mentors }
            })
            .collect())
    }

    pub async fn get(&self, id: &str) -> Result<GroupDetails, GroupError> {
        let group = self.repo.find(id).await?.ok_or_else(|| GroupError::NotFound {
            message: NOT_FOUND.into(),
            context: Some(id.to_owned().into()),
        })?;
        let members = self.repo.members(vec![group.uid.clone()]).await?;
        let mentors = self.repo.mentors(vec![group.uid.clone()]).await?;
        Ok(GroupDetails { group, members, mentors })
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn add_member(
        &self,
        actor: &CurrentUser,
        id: &str,
        request: AddMemberRequest,
    ) -> Result<GroupDetails, GroupError> {
        let details = self.get(id).await?;
        ensure_leader_or_staff(actor, &details)?;

        let student = self.users.require_role(&request.student_id, Role::Student).await?;
        if details.member(&student.uid).is_some() {
            return Err(GroupError::Conflict {
                message: "Sinh viên đã là thành viên của nhóm".into(),
                context: Some(student.uid.into()),
            });
        }
        self.ensure_student_free(&student.uid, &details.group.semester).await?;

        let capacity = self.capacity(&details.group).await?;
        if i64::try_from(details.members.len()).unwrap_or(i64::MAX) >= capacity {
            return Err(GroupError::Conflict {
                message: format!("Nhóm đã đủ {capacity} thành viên").into(),
                context: Some(details.group.uid.into()),
            });
        }

        let member = MemberRecord {
            uid: safe_nanoid!(),
            group_id: details.group.uid.clone(),
            student_id: student.uid,
            semester: details.group.semester.clone(),
            is_leader: details.members.is_empty(),
            seq: self.repo.next_member_seq(&details.group.uid).await?,
            joined_at: timeline::format(timeline::now()),
            is_deleted: false,
            deleted_at: None,
        };
        self.repo.insert_member(&member).await?;

        info!(group = %details.group.uid, student = %member.student_id, "Group member added");
        self.publish(GroupMemberAdded {
            group_id: details.group.uid.clone(),
            group_code: details.group.code.clone(),
            student_id: member.student_id.clone(),
        });
        self.get(&details.group.uid).await
    }

    /// Removes a member; the leader, staff or the student themself may do it.
    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn remove_member(
        &self,
        actor: &CurrentUser,
        id: &str,
        student_id: &str,
    ) -> Result<GroupDetails, GroupError> {
        let details = self.get(id).await?;
        if actor.id != student_id {
            ensure_leader_or_staff(actor, &details)?;
        }
        let member = details.member(student_id).ok_or_else(|| GroupError::NotFound {
            message: "Sinh viên không thuộc nhóm".into(),
            context: Some(student_id.to_owned().into()),
        })?;

        if details.group.topic_id.is_some() {
            let min = self.settings.limit(SettingKey::MinGroupMembers).await?;
            if i64::try_from(details.members.len() - 1).unwrap_or(i64::MAX) < min {
                return Err(GroupError::Validation {
                    message: format!("Nhóm đã có đề tài phải có ít nhất {min} thành viên").into(),
                    context: None,
                });
            }
        }

        let next_leader = member
            .is_leader
            .then(|| successor(&details.members, student_id))
            .flatten()
            .map(|m| m.uid.clone());
        self.repo
            .remove_member(
                &details.group.uid,
                &member.uid,
                next_leader.clone(),
                timeline::format(timeline::now()),
            )
            .await?;

        info!(group = %details.group.uid, student = %student_id, new_leader = ?next_leader, "Group member removed");
        self.get(&details.group.uid).await
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id))]
    pub async fn change_leader(
        &self,
        actor: &CurrentUser,
        id: &str,
        request: ChangeLeaderRequest,
    ) -> Result<GroupDetails, GroupError> {
        let details = self.get(id).await?;
        ensure_leader_or_staff(actor, &details)?;
        let member = details.member(&request.student_id).ok_or_else(|| GroupError::Validation {
            message: "Trưởng nhóm mới phải là thành viên của nhóm".into(),
            context: Some(request.student_id.clone().into()),
        })?;

        if !member.is_leader {
            self.repo
                .change_leader(&details.group.uid, &member.uid, timeline::format(timeline::now()))
                .await?;
            info!(group = %details.group.uid, leader = %request.student_id, "Group leader changed");
        }
        self.get(&details.group.uid).await
    }

    #[instrument(skip(self, actor, request), fields(actor = %actor.id, role = %request.role))]
    pub async fn add_mentor(
        &self,
        actor: &CurrentUser,
        id: &str,
        request: AddMentorRequest,
    ) -> Result<GroupDetails, GroupError> {
        let details = self.get(id).await?;
        let lecturer = self.users.require_role(&request.lecturer_id, Role::Lecturer).await?;
        ensure_mentor_seat(&details, &lecturer.uid, request.role)?;

        if request.role == MentorRole::Main {
            if let Some(topic_id) = details.group.topic_id.as_deref() {
                let topic = self.topics.get(topic_id).await?;
                if topic.main_mentor_id != lecturer.uid {
                    return Err(GroupError::Validation {
                        message: "Giảng viên hướng dẫn chính phải là giảng viên hướng dẫn của đề tài"
                            .into(),
                        context: None,
                    });
                }
            }
        }
        self.ensure_off_council(&details.group.uid, &lecturer.uid).await?;
        self.ensure_mentor_load(&lecturer.uid, &details.group.semester).await?;

        let mentor = MentorRecord {
            uid: safe_nanoid!(),
            group_id: details.group.uid.clone(),
            lecturer_id: lecturer.uid,
            semester: details.group.semester.clone(),
            role: request.role,
            assigned_at: timeline::format(timeline::now()),
            is_deleted: false,
            deleted_at: None,
        };
        self.repo.insert_mentor(&mentor).await?;

        info!(group = %details.group.uid, lecturer = %mentor.lecturer_id, "Mentor assigned");
        self.publish(MentorAssigned {
            group_id: details.group.uid.clone(),
            group_code: details.group.code.clone(),
            lecturer_id: mentor.lecturer_id,
            role: mentor.role,
        });
        self.get(&details.group.uid).await
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn remove_mentor(
        &self,
        actor: &CurrentUser,
        id: &str,
        lecturer_id: &str,
    ) -> Result<GroupDetails, GroupError> {
        let details = self.get(id).await?;
        let mentor = details.mentor(lecturer_id).ok_or_else(|| GroupError::NotFound {
            message: "Giảng viên không hướng dẫn nhóm này".into(),
            context: Some(lecturer_id.to_owned().into()),
        })?;
        if mentor.role == MentorRole::Main && details.group.topic_id.is_some() {
            return Err(GroupError::Validation {
                message: "Không thể gỡ giảng viên hướng dẫn chính của nhóm đã có đề tài".into(),
                context: None,
            });
        }

        self.repo.remove_mentor(&mentor.uid, timeline::format(timeline::now())).await?;
        info!(group = %details.group.uid, lecturer = %lecturer_id, "Mentor removed");
        self.get(&details.group.uid).await
    }

    /// Links an approved topic to the group and attaches the topic's mentors.
    #[instrument(skip(self, actor, request), fields(actor = %actor.id, topic = %request.topic_id))]
    pub async fn assign_topic(
        &self,
        actor: &CurrentUser,
        id: &str,
        request: AssignTopicRequest,
    ) -> Result<GroupDetails, GroupError> {
        let details = self.get(id).await?;
        ensure_leader_or_staff(actor, &details)?;
        let topic = self.topics.get(&request.topic_id).await?;

        if details.group.topic_id.as_deref() == Some(topic.uid.as_str()) {
            return Ok(details);
        }
        if topic.status != TopicStatus::Approved {
            return Err(GroupError::Validation {
                message: "Chỉ có thể gán đề tài đã được duyệt".into(),
                context: Some(topic.uid.into()),
            });
        }
        if topic.semester != details.group.semester {
            return Err(GroupError::Validation {
                message: "Đề tài và nhóm phải thuộc cùng học kỳ".into(),
                context: None,
            });
        }
        if topic.group_id.is_some() {
            return Err(GroupError::Conflict {
                message: "Đề tài đã được gán cho nhóm khác".into(),
                context: Some(topic.uid.into()),
            });
        }

        let min = self.settings.limit(SettingKey::MinGroupMembers).await?;
        ensure_member_count(details.members.len(), min, i64::from(topic.max_students))?;

        let now = timeline::format(timeline::now());
        let mut attached = Vec::new();
        match details.mentor_with_role(MentorRole::Main) {
            Some(main) if main.lecturer_id != topic.main_mentor_id => {
                return Err(GroupError::Validation {
                    message: "Giảng viên hướng dẫn chính của nhóm khác với đề tài".into(),
                    context: None,
                });
            },
            Some(_) => {},
            None => {
                if details.is_mentor(&topic.main_mentor_id) {
                    return Err(GroupError::Conflict {
                        message: "Giảng viên hướng dẫn chính của đề tài đang là hướng dẫn phụ của nhóm"
                            .into(),
                        context: None,
                    });
                }
                attached.push((topic.main_mentor_id.clone(), MentorRole::Main));
            },
        }
        if let Some(sub) = topic.sub_mentor_id.as_deref() {
            if details.mentor_with_role(MentorRole::Sub).is_none() && !details.is_mentor(sub) {
                attached.push((sub.to_owned(), MentorRole::Sub));
            }
        }

        let mut mentors = Vec::with_capacity(attached.len());
        for (lecturer_id, role) in attached {
            self.ensure_off_council(&details.group.uid, &lecturer_id).await?;
            self.ensure_mentor_load(&lecturer_id, &details.group.semester).await?;
            mentors.push(MentorRecord {
                uid: safe_nanoid!(),
                group_id: details.group.uid.clone(),
                lecturer_id,
                semester: details.group.semester.clone(),
                role,
                assigned_at: now.clone(),
                is_deleted: false,
                deleted_at: None,
            });
        }

        self.repo
            .assign_topic(
                &details.group.uid,
                &topic.uid,
                details.group.topic_id.clone(),
                mentors.clone(),
                now,
            )
            .await?;

        info!(group = %details.group.uid, topic = %topic.uid, "Topic assigned to group");
        for mentor in mentors {
            self.publish(MentorAssigned {
                group_id: details.group.uid.clone(),
                group_code: details.group.code.clone(),
                lecturer_id: mentor.lecturer_id,
                role: mentor.role,
            });
        }
        self.get(&details.group.uid).await
    }

    #[instrument(skip(self, actor), fields(actor = %actor.id))]
    pub async fn delete(&self, actor: &CurrentUser, id: &str) -> Result<(), GroupError> {
        let details = self.get(id).await?;
        self.repo.delete(&details.group.uid, timeline::format(timeline::now())).await?;
        info!(group = %details.group.uid, "Group deleted");
        Ok(())
    }

    /// The topic's capacity once assigned, otherwise `MAX_GROUP_MEMBERS`.
    async fn capacity(&self, group: &GroupRecord) -> Result<i64, GroupError> {
        match group.topic_id.as_deref() {
            Some(topic_id) => Ok(i64::from(self.topics.get(topic_id).await?.max_students)),
            None => Ok(self.settings.limit(SettingKey::MaxGroupMembers).await?),
        }
    }

    async fn ensure_student_free(&self, student: &str, semester: &str) -> Result<(), GroupError> {
        if self.repo.group_of_student(student, semester).await?.is_some() {
            return Err(GroupError::Conflict {
                message: format!("Sinh viên đã thuộc một nhóm khác trong học kỳ {semester}").into(),
                context: Some(student.to_owned().into()),
            });
        }
        Ok(())
    }

    /// A lecturer sitting on a council that judges the group may not mentor it.
    async fn ensure_off_council(&self, group: &str, lecturer: &str) -> Result<(), GroupError> {
        if let Some(council) = self.repo.council_seat(group, lecturer).await? {
            return Err(GroupError::Conflict {
                message: "Thành viên hội đồng chấm nhóm không được làm giảng viên hướng dẫn".into(),
                context: Some(council.into()),
            });
        }
        Ok(())
    }

    async fn ensure_mentor_load(&self, lecturer: &str, semester: &str) -> Result<(), GroupError> {
        let quota = self.settings.limit(SettingKey::MaxGroupsPerMentor).await?;
        if self.repo.mentor_load(lecturer, semester).await? >= quota {
            return Err(GroupError::Conflict {
                message: format!("Giảng viên đã hướng dẫn tối đa {quota} nhóm trong học kỳ").into(),
                context: Some(lecturer.to_owned().into()),
            });
        }
        Ok(())
    }

    fn publish<E: Send + Sync + 'static>(&self, event: E) {
        if let Err(err) = self.events.publish(event) {
            warn!(error = %err, "Failed to publish group event");
        }
    }
}

fn ensure_leader_or_staff(actor: &CurrentUser, details: &GroupDetails) -> Result<(), GroupError> {
    if actor.is_staff() || details.leader().is_some_and(|l| l.student_id == actor.id) {
        Ok(())
    } else {
        Err(GroupError::Forbidden { message: FORBIDDEN.into(), context: None })
    }
}
