//! Similarity check run before a topic is registered. Only a stub exists:
//! it accepts every title and hands back generic writing advice.

use crate::model::{TopicValidation, ValidateTopicRequest};
use std::fmt::Debug;

pub trait TopicValidator: Debug + Send + Sync + 'static {
    fn validate(&self, request: &ValidateTopicRequest) -> TopicValidation;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StubTopicValidator;

impl TopicValidator for StubTopicValidator {
    fn validate(&self, request: &ValidateTopicRequest) -> TopicValidation {
        let mut suggestions = vec![
            "Nêu rõ phạm vi và đối tượng nghiên cứu của đề tài".to_owned(),
            "Bổ sung công nghệ hoặc phương pháp dự kiến sử dụng".to_owned(),
        ];
        if request.title_en.as_deref().is_none_or(|t| t.trim().is_empty()) {
            suggestions.push("Bổ sung tên đề tài bằng tiếng Anh".to_owned());
        }
        TopicValidation {
            is_valid: true,
            similarity_score: 0.0,
            similar_topics: Vec::new(),
            suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stub_accepts_everything() {
        let request = ValidateTopicRequest {
            title_vi: "Hệ thống quản lý khóa luận".into(),
            title_en: None,
            description: None,
        };
        let result = StubTopicValidator.validate(&request);
        assert!(result.is_valid);
        assert!(result.similar_topics.is_empty());
        assert_eq!(result.suggestions.len(), 3);
    }
}
