//! Discount Rule Matcher
//!
//! Logic for matching rules to a product category, quantity, and date, and
//! for picking the winning rule among the matches.

use crate::db::models::DiscountRule;

/// Check if a rule covers the given category.
///
/// An unset filter applies to all categories; otherwise the filter is a
/// substring match (the stored value is a comma-separated category list).
pub fn matches_category(rule: &DiscountRule, category: &str) -> bool {
    match &rule.applicable_categories {
        Some(filter) => filter.contains(category),
        None => true,
    }
}

/// Check if `today` (ISO `YYYY-MM-DD`) falls inside the rule's validity
/// window. Either bound may be unset, leaving that side open.
pub fn in_validity_window(rule: &DiscountRule, today: &str) -> bool {
    if let Some(start) = &rule.start_date
        && start.as_str() > today
    {
        return false;
    }
    if let Some(end) = &rule.end_date
        && end.as_str() < today
    {
        return false;
    }
    true
}

/// Check if the ordered quantity reaches the rule's threshold.
pub fn qualifies(rule: &DiscountRule, quantity_kg: f64) -> bool {
    rule.min_quantity_kg <= quantity_kg
}

/// Select the winning rule: among active rules that qualify on quantity,
/// category, and date, the one with the highest threshold wins. Equal
/// thresholds are broken deterministically by lowest rule ID.
pub fn select_rule<'a>(
    rules: &'a [DiscountRule],
    category: &str,
    quantity_kg: f64,
    today: &str,
) -> Option<&'a DiscountRule> {
    rules
        .iter()
        .filter(|r| r.is_active)
        .filter(|r| qualifies(r, quantity_kg))
        .filter(|r| matches_category(r, category))
        .filter(|r| in_validity_window(r, today))
        .min_by(|a, b| {
            b.min_quantity_kg
                .partial_cmp(&a.min_quantity_kg)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.rule_id.cmp(&b.rule_id))
        })
}
