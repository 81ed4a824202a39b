//! Category scores as integers 0..=100.

use serde::{Deserialize, Serialize};

use crate::api::{Category, LighthouseResult};

/// `round(score * 100)`; a missing or null score is 0.
pub fn score_to_percent(score: Option<f64>) -> u32 {
    match score {
        Some(s) if s.is_finite() => (s * 100.0).round().clamp(0.0, 100.0) as u32,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScores {
    pub performance: u32,
    pub accessibility: u32,
    pub best_practices: u32,
    pub seo: u32,
}

impl CategoryScores {
    pub fn from_lighthouse(lighthouse: &LighthouseResult) -> Self {
        let mut scores = Self::default();
        for category in Category::ALL {
            let raw = lighthouse
                .categories
                .get(category.key())
                .and_then(|c| c.score);
            scores.set(category, score_to_percent(raw));
        }
        scores
    }

    pub fn get(&self, category: Category) -> u32 {
        match category {
            Category::Performance => self.performance,
            Category::Accessibility => self.accessibility,
            Category::BestPractices => self.best_practices,
            Category::Seo => self.seo,
        }
    }

    pub fn set(&mut self, category: Category, value: u32) {
        match category {
            Category::Performance => self.performance = value,
            Category::Accessibility => self.accessibility = value,
            Category::BestPractices => self.best_practices = value,
            Category::Seo => self.seo = value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding() {
        assert_eq!(score_to_percent(Some(0.873)), 87);
        assert_eq!(score_to_percent(Some(0.875)), 88);
        assert_eq!(score_to_percent(Some(1.0)), 100);
        assert_eq!(score_to_percent(Some(0.0)), 0);
        assert_eq!(score_to_percent(None), 0);
        assert_eq!(score_to_percent(Some(f64::NAN)), 0);
    }

    #[test]
    fn get_set_cover_every_category() {
        let mut s = CategoryScores::default();
        for (i, c) in Category::ALL.into_iter().enumerate() {
            s.set(c, i as u32 + 1);
        }
        assert_eq!(s.get(Category::Performance), 1);
        assert_eq!(s.get(Category::Seo), 4);
    }
}
