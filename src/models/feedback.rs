use serde::Serialize;

use crate::error::FeedbackError;

/// Star rating for a plan, optionally with a comment. Built only through
/// [`PlanFeedback::new`], so the rating is always in range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanFeedback {
    rating: u8,

    #[serde(skip_serializing_if = "Option::is_none")]
    comment: Option<String>,
}

impl PlanFeedback {
    pub const MIN_RATING: u8 = 1;
    pub const MAX_RATING: u8 = 5;

    /// Validate the rating and drop blank comments
    pub fn new(rating: u8, comment: Option<String>) -> Result<Self, FeedbackError> {
        if !(Self::MIN_RATING..=Self::MAX_RATING).contains(&rating) {
            return Err(FeedbackError::RatingOutOfRange(rating));
        }

        let comment = comment
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(Self { rating, comment })
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    pub fn comment(&self) -> Option<&str> {
        self.comment.as_deref()
    }

    /// Render as filled and empty stars
    pub fn stars(&self) -> String {
        let filled = "★".repeat(self.rating as usize);
        let empty = "☆".repeat(Self::MAX_RATING.saturating_sub(self.rating) as usize);
        format!("{}{}", filled, empty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert_eq!(PlanFeedback::new(0, None), Err(FeedbackError::RatingOutOfRange(0)));
        assert_eq!(PlanFeedback::new(6, None), Err(FeedbackError::RatingOutOfRange(6)));
        assert!(PlanFeedback::new(1, None).is_ok());
        assert_eq!(PlanFeedback::new(5, None).unwrap().stars(), "★★★★★");
    }

    #[test]
    fn test_stars_for_every_valid_rating() {
        for rating in PlanFeedback::MIN_RATING..=PlanFeedback::MAX_RATING {
            let feedback = PlanFeedback::new(rating, Some(" ok ".to_string())).unwrap();
            assert_eq!(feedback.rating(), rating);
            assert_eq!(feedback.comment(), Some("ok"));
            assert_eq!(feedback.stars().chars().count(), 5);
        }
    }

    #[test]
    fn test_blank_comment_is_dropped() {
        let feedback = PlanFeedback::new(4, Some("   ".to_string())).unwrap();
        assert_eq!(feedback.comment(), None);
        assert_eq!(feedback.stars(), "★★★★☆");
    }
}
