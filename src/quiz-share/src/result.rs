//! Quiz result value object and share platforms.

use serde::{Deserialize, Serialize};

use crate::{Result, ShareError};

/// Where a result is being shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Twitter,
    /// The host's native share sheet.
    Native,
    /// Copy message and link to the clipboard.
    #[serde(alias = "copy")]
    Clipboard,
}

impl Platform {
    /// Name sent to the share link endpoint.
    ///
    /// The server records clipboard shares as `copy`.
    pub fn wire_name(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Native => "native",
            Platform::Clipboard => "copy",
        }
    }

    /// Whether the trigger shows a loading indicator while the link resolves.
    pub fn shows_loading(self) -> bool {
        matches!(self, Platform::Facebook | Platform::Twitter)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Native => "native",
            Platform::Clipboard => "clipboard",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Platform {
    type Err = ShareError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "facebook" => Ok(Platform::Facebook),
            "twitter" | "x" => Ok(Platform::Twitter),
            "native" => Ok(Platform::Native),
            "clipboard" | "copy" => Ok(Platform::Clipboard),
            _ => Err(ShareError::UnknownPlatform(s.to_string())),
        }
    }
}

/// A finished quiz, validated once at construction and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizResult {
    rule_set_slug: String,
    quiz_name: String,
    score: u32,
    correct_answers: u32,
    total_questions: u32,
    success: bool,
    perfect_bonus: bool,
    combo_max: u32,
}

impl QuizResult {
    pub fn new(
        rule_set_slug: impl Into<String>,
        quiz_name: impl Into<String>,
        score: u32,
        correct_answers: u32,
        total_questions: u32,
        success: bool,
    ) -> Result<Self> {
        let rule_set_slug = rule_set_slug.into();

        if rule_set_slug.trim().is_empty() {
            return Err(ShareError::InvalidResult(
                "rule set slug must not be empty".into(),
            ));
        }
        if total_questions == 0 {
            return Err(ShareError::InvalidResult(
                "total_questions must be greater than zero".into(),
            ));
        }
        if correct_answers > total_questions {
            return Err(ShareError::InvalidResult(format!(
                "correct_answers ({correct_answers}) exceeds total_questions ({total_questions})"
            )));
        }

        Ok(Self {
            rule_set_slug,
            quiz_name: quiz_name.into(),
            score,
            correct_answers,
            total_questions,
            success,
            perfect_bonus: false,
            combo_max: 0,
        })
    }

    pub fn with_perfect_bonus(mut self, perfect_bonus: bool) -> Self {
        self.perfect_bonus = perfect_bonus;
        self
    }

    pub fn with_combo_max(mut self, combo_max: u32) -> Self {
        self.combo_max = combo_max;
        self
    }

    pub fn rule_set_slug(&self) -> &str {
        &self.rule_set_slug
    }

    pub fn quiz_name(&self) -> &str {
        &self.quiz_name
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn correct_answers(&self) -> u32 {
        self.correct_answers
    }

    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn perfect_bonus(&self) -> bool {
        self.perfect_bonus
    }

    pub fn combo_max(&self) -> u32 {
        self.combo_max
    }
}

/// Declarative configuration carried by a share trigger in the page markup.
///
/// Read once when the session is built; later changes are not observed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareAttributes {
    pub score: u32,
    pub correct_answers: u32,
    pub total_questions: u32,
    pub quiz_name: String,
    pub quiz_slug: String,
    pub success: bool,
    #[serde(default)]
    pub perfect_bonus: bool,
    #[serde(default)]
    pub combo_max: u32,
}

impl TryFrom<ShareAttributes> for QuizResult {
    type Error = ShareError;

    fn try_from(attrs: ShareAttributes) -> Result<Self> {
        Ok(QuizResult::new(
            attrs.quiz_slug,
            attrs.quiz_name,
            attrs.score,
            attrs.correct_answers,
            attrs.total_questions,
            attrs.success,
        )?
        .with_perfect_bonus(attrs.perfect_bonus)
        .with_combo_max(attrs.combo_max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults_optional_fields() {
        let result = QuizResult::new("capitales", "Capitales", 850, 8, 10, true).unwrap();
        assert!(!result.perfect_bonus());
        assert_eq!(result.combo_max(), 0);
        assert_eq!(result.rule_set_slug(), "capitales");
    }

    #[test]
    fn test_new_rejects_invalid_counts() {
        assert!(matches!(
            QuizResult::new("capitales", "Capitales", 0, 0, 0, false),
            Err(ShareError::InvalidResult(_))
        ));
        assert!(matches!(
            QuizResult::new("capitales", "Capitales", 0, 11, 10, false),
            Err(ShareError::InvalidResult(_))
        ));
        assert!(matches!(
            QuizResult::new("  ", "Capitales", 0, 1, 10, false),
            Err(ShareError::InvalidResult(_))
        ));
    }

    #[test]
    fn test_attributes_from_markup() {
        let attrs: ShareAttributes = serde_json::from_value(serde_json::json!({
            "score": 1200,
            "correctAnswers": 10,
            "totalQuestions": 10,
            "quizName": "Drapeaux",
            "quizSlug": "drapeaux-europe",
            "success": true,
            "perfectBonus": true,
            "comboMax": 7
        }))
        .unwrap();

        let result = QuizResult::try_from(attrs).unwrap();
        assert_eq!(result.rule_set_slug(), "drapeaux-europe");
        assert!(result.perfect_bonus());
        assert_eq!(result.combo_max(), 7);
    }

    #[test]
    fn test_attributes_optional_fields_default() {
        let attrs: ShareAttributes = serde_json::from_value(serde_json::json!({
            "score": 300,
            "correctAnswers": 3,
            "totalQuestions": 10,
            "quizName": "Fleuves",
            "quizSlug": "fleuves",
            "success": false
        }))
        .unwrap();

        assert!(!attrs.perfect_bonus);
        assert_eq!(attrs.combo_max, 0);
    }

    #[test]
    fn test_platform_names() {
        assert_eq!(Platform::Clipboard.wire_name(), "copy");
        assert_eq!(Platform::Twitter.wire_name(), "twitter");
        assert_eq!("copy".parse::<Platform>().unwrap(), Platform::Clipboard);
        assert_eq!("X".parse::<Platform>().unwrap(), Platform::Twitter);
        assert!(matches!(
            "myspace".parse::<Platform>(),
            Err(ShareError::UnknownPlatform(name)) if name == "myspace"
        ));
        assert!(Platform::Facebook.shows_loading());
        assert!(!Platform::Native.shows_loading());
    }
}
