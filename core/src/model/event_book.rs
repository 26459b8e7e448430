use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::language::Language;

/// A named collection of tasks.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EventBook {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon: String,
    /// Hex color, e.g. "#3B82F6".
    #[serde(default)]
    pub color: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl EventBook {
    pub fn new(name: String, description: String, icon: String, color: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            icon,
            color,
            created_at: now,
            updated_at: Some(now),
        }
    }

    /// Books seeded into an empty store.
    pub fn builtin() -> Vec<EventBook> {
        let now = Utc::now();
        [
            ("university", "graduation-cap", "#3B82F6"),
            ("life", "home", "#10B981"),
            ("fitness", "dumbbell", "#F59E0B"),
            ("work", "briefcase", "#8B5CF6"),
        ]
        .into_iter()
        .map(|(id, icon, color)| EventBook {
            id: id.to_string(),
            name: builtin_name(id, Language::Zh).unwrap_or(id).to_string(),
            description: builtin_description(id, Language::Zh).unwrap_or("").to_string(),
            icon: icon.to_string(),
            color: color.to_string(),
            created_at: now,
            updated_at: Some(now),
        })
        .collect()
    }

    /// Name to show. Built-in books are translated, user books keep their own name.
    pub fn display_name(&self, language: Language) -> &str {
        builtin_name(&self.id, language).unwrap_or(self.name.as_str())
    }

    pub fn display_description(&self, language: Language) -> &str {
        builtin_description(&self.id, language).unwrap_or(self.description.as_str())
    }
}

fn builtin_name(id: &str, language: Language) -> Option<&'static str> {
    let pair = match id {
        "university" => ("大学", "University"),
        "life" => ("生活", "Life"),
        "fitness" => ("健身", "Fitness"),
        "work" => ("工作", "Work"),
        _ => return None,
    };
    Some(language.pick(pair.0, pair.1))
}

fn builtin_description(id: &str, language: Language) -> Option<&'static str> {
    let pair = match id {
        "university" => ("课程作业、考试和学术项目", "Coursework, exams and academic projects"),
        "life" => ("日常事务和个人安排", "Daily affairs and personal arrangements"),
        "fitness" => ("运动计划和健康目标", "Exercise plans and health goals"),
        "work" => ("项目任务和职业发展", "Project tasks and career development"),
        _ => return None,
    };
    Some(language.pick(pair.0, pair.1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_names_are_localized() {
        let books = EventBook::builtin();
        assert_eq!(books.len(), 4);
        let uni = &books[0];
        assert_eq!(uni.display_name(Language::Zh), "大学");
        assert_eq!(uni.display_name(Language::En), "University");
        assert_eq!(
            uni.display_description(Language::En),
            "Coursework, exams and academic projects"
        );
    }

    #[test]
    fn test_custom_book_keeps_its_name() {
        let book = EventBook::new(
            "Side project".to_string(),
            "weekend hacking".to_string(),
            "code".to_string(),
            "#000000".to_string(),
        );
        assert_eq!(book.display_name(Language::Zh), "Side project");
        assert_eq!(book.display_description(Language::En), "weekend hacking");
    }
}
