//! Letter grade and threshold-based recommendations.

use super::metrics::CoreMetrics;
use super::scores::CategoryScores;
use crate::api::Category;

/// Letter grade from the performance score.
pub fn grade(performance: u32) -> &'static str {
    match performance {
        90..=u32::MAX => "A",
        80..=89 => "B",
        70..=79 => "C",
        60..=69 => "D",
        _ => "F",
    }
}

/// (value, "good" threshold, label, target text) for each metric.
fn metric_checks(m: &CoreMetrics) -> [(Option<f64>, f64, &'static str, &'static str); 6] {
    let v = |metric: &Option<super::Metric>| metric.as_ref().map(|x| x.value);
    [
        (v(&m.largest_contentful_paint), 2500.0, "Largest Contentful Paint", "2.5 s"),
        (v(&m.cumulative_layout_shift), 0.1, "Cumulative Layout Shift", "0.1"),
        (v(&m.total_blocking_time), 200.0, "Total Blocking Time", "200 ms"),
        (v(&m.first_contentful_paint), 1800.0, "First Contentful Paint", "1.8 s"),
        (v(&m.speed_index), 3400.0, "Speed Index", "3.4 s"),
        (v(&m.time_to_interactive), 3800.0, "Time to Interactive", "3.8 s"),
    ]
}

/// Recommendations for every metric over its "good" threshold and every
/// requested category under 90. Categories that were not requested are skipped.
pub fn recommendations(
    scores: &CategoryScores,
    metrics: &CoreMetrics,
    categories: &[Category],
) -> Vec<String> {
    let mut out = Vec::new();
    let requested = |c: Category| categories.contains(&c);

    if requested(Category::Performance) {
        if scores.performance < 50 {
            out.push(format!(
                "Performance score is critical ({}); prioritize render-blocking resources, image sizes and JavaScript execution time",
                scores.performance
            ));
        } else if scores.performance < 90 {
            out.push(format!(
                "Performance score is {}; review the opportunities in the performance audits",
                scores.performance
            ));
        }
    }

    for (value, threshold, label, target) in metric_checks(metrics) {
        if let Some(value) = value {
            if value > threshold {
                out.push(format!(
                    "Improve {} ({}; target under {})",
                    label,
                    describe(label, value),
                    target
                ));
            }
        }
    }

    if requested(Category::Accessibility) && scores.accessibility < 90 {
        out.push(format!(
            "Accessibility score is {}; check contrast, labels and alt text",
            scores.accessibility
        ));
    }
    if requested(Category::BestPractices) && scores.best_practices < 90 {
        out.push(format!(
            "Best practices score is {}; check HTTPS resources, console errors and deprecated APIs",
            scores.best_practices
        ));
    }
    if requested(Category::Seo) && scores.seo < 90 {
        out.push(format!(
            "SEO score is {}; check meta descriptions, crawlability and link text",
            scores.seo
        ));
    }
    out
}

fn describe(label: &str, value: f64) -> String {
    if label == "Cumulative Layout Shift" {
        format!("currently {:.2}", value)
    } else if value >= 1000.0 {
        format!("currently {:.1} s", value / 1000.0)
    } else {
        format!("currently {:.0} ms", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::Metric;

    fn m(value: f64) -> Option<Metric> {
        Some(Metric {
            value,
            display_value: None,
            score: None,
        })
    }

    #[test]
    fn grades() {
        assert_eq!(grade(100), "A");
        assert_eq!(grade(90), "A");
        assert_eq!(grade(89), "B");
        assert_eq!(grade(70), "C");
        assert_eq!(grade(60), "D");
        assert_eq!(grade(12), "F");
    }

    #[test]
    fn perfect_page_has_no_recommendations() {
        let scores = CategoryScores {
            performance: 98,
            accessibility: 100,
            best_practices: 95,
            seo: 92,
        };
        let metrics = CoreMetrics {
            largest_contentful_paint: m(1200.0),
            cumulative_layout_shift: m(0.01),
            total_blocking_time: m(50.0),
            ..CoreMetrics::default()
        };
        assert!(recommendations(&scores, &metrics, &Category::ALL).is_empty());
    }

    #[test]
    fn slow_page_flags_metrics_and_categories() {
        let scores = CategoryScores {
            performance: 31,
            accessibility: 80,
            best_practices: 100,
            seo: 100,
        };
        let metrics = CoreMetrics {
            largest_contentful_paint: m(5200.0),
            cumulative_layout_shift: m(0.31),
            total_blocking_time: m(640.0),
            ..CoreMetrics::default()
        };
        let recs = recommendations(&scores, &metrics, &Category::ALL);
        assert!(recs[0].contains("critical"));
        assert!(recs.iter().any(|r| r.contains("Largest Contentful Paint (currently 5.2 s")));
        assert!(recs.iter().any(|r| r.contains("Cumulative Layout Shift (currently 0.31")));
        assert!(recs.iter().any(|r| r.contains("Total Blocking Time (currently 640 ms")));
        assert!(recs.iter().any(|r| r.starts_with("Accessibility")));
        assert!(!recs.iter().any(|r| r.starts_with("SEO")));
    }

    #[test]
    fn unrequested_categories_are_not_flagged() {
        let scores = CategoryScores {
            performance: 95,
            ..CategoryScores::default()
        };
        let recs = recommendations(&scores, &CoreMetrics::default(), &[Category::Performance]);
        assert!(recs.is_empty(), "{:?}", recs);

        let recs = recommendations(&scores, &CoreMetrics::default(), &[Category::Seo]);
        assert_eq!(recs.len(), 1);
        assert!(recs[0].starts_with("SEO score is 0"));
    }
}
