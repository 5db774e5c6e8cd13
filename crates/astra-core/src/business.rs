//! # Business Input
//!
//! The description a caller submits for analysis, and the profile record
//! persisted in the `businesses` collection.
//!
//! ## Rules
//!
//! | Field             | Constraint |
//! |-------------------|------------|
//! | `business_type`   | 2..=100 chars after trimming, no `<`, `>`, `{`, `}` or `script` |
//! | `target_market`   | 2..=200 chars |
//! | `monthly_budget`  | `^\$?\d+([,.]\d+)?$` |
//! | `primary_goal`    | 10..=500 chars |
//! | `additional_info` | at most 1000 chars |

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ValidationError;

const BUDGET_PATTERN: &str = r"^\$?\d+([,.]\d+)?$";
const FORBIDDEN_IN_TYPE: [&str; 5] = ["<", ">", "{", "}", "script"];

static BUDGET: Lazy<Result<Regex, regex::Error>> = Lazy::new(|| Regex::new(BUDGET_PATTERN));

/// Business description submitted to `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BusinessInput {
    pub business_type: String,
    pub target_market: String,
    pub monthly_budget: String,
    pub primary_goal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl BusinessInput {
    /// Check every field rule, returning the first violation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let business_type = self.business_type.trim();
        if FORBIDDEN_IN_TYPE.iter().any(|f| business_type.contains(f)) {
            return Err(ValidationError::ForbiddenContent("business_type"));
        }
        check_length("business_type", business_type, 2, 100)?;
        check_length("target_market", &self.target_market, 2, 200)?;

        let budget = (*BUDGET).as_ref().map_err(|e| ValidationError::Format {
            field: "monthly_budget",
            reason: e.to_string(),
        })?;
        if !budget.is_match(&self.monthly_budget) {
            return Err(ValidationError::Format {
                field: "monthly_budget",
                reason: "expected an amount such as 5000, $5000 or $5,000".into(),
            });
        }

        check_length("primary_goal", &self.primary_goal, 10, 500)?;
        if let Some(info) = &self.additional_info {
            check_length("additional_info", info, 0, 1000)?;
        }
        Ok(())
    }

    /// Validate and return the input with `business_type` trimmed.
    pub fn into_validated(mut self) -> Result<Self, ValidationError> {
        self.validate()?;
        self.business_type = self.business_type.trim().to_string();
        Ok(self)
    }
}

fn check_length(
    field: &'static str,
    value: &str,
    min: usize,
    max: usize,
) -> Result<(), ValidationError> {
    let actual = value.chars().count();
    if actual < min || actual > max {
        return Err(ValidationError::Length {
            field,
            min,
            max,
            actual,
        });
    }
    Ok(())
}

/// A business description as stored in the `businesses` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BusinessProfile {
    pub id: Uuid,
    pub business_type: String,
    pub target_market: String,
    pub monthly_budget: String,
    pub primary_goal: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl BusinessProfile {
    /// Stamp an input with a fresh id and creation time.
    pub fn new(input: BusinessInput) -> Self {
        Self {
            id: Uuid::new_v4(),
            business_type: input.business_type,
            target_market: input.target_market,
            monthly_budget: input.monthly_budget,
            primary_goal: input.primary_goal,
            additional_info: input.additional_info,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn valid_input() -> BusinessInput {
        BusinessInput {
            business_type: "SaaS".into(),
            target_market: "Small businesses in India".into(),
            monthly_budget: "$5,000".into(),
            primary_goal: "Acquire the first 500 paying users".into(),
            additional_info: None,
        }
    }

    #[test]
    fn accepts_valid_input() {
        assert!(valid_input().validate().is_ok());
    }

    #[test]
    fn trims_business_type() {
        let mut input = valid_input();
        input.business_type = "  Coffee Shop  ".into();
        let validated = input.into_validated().unwrap();
        assert_eq!(validated.business_type, "Coffee Shop");
    }

    #[test]
    fn rejects_markup_in_business_type() {
        for bad in ["<b>SaaS</b>", "SaaS {x}", "javascript app"] {
            let mut input = valid_input();
            input.business_type = bad.into();
            assert_eq!(
                input.validate(),
                Err(ValidationError::ForbiddenContent("business_type")),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_short_business_type() {
        let mut input = valid_input();
        input.business_type = " a ".into();
        assert!(matches!(
            input.validate(),
            Err(ValidationError::Length {
                field: "business_type",
                ..
            })
        ));
    }

    #[test]
    fn rejects_short_primary_goal() {
        let mut input = valid_input();
        input.primary_goal = "grow".into();
        assert!(matches!(
            input.validate(),
            Err(ValidationError::Length {
                field: "primary_goal",
                actual: 4,
                ..
            })
        ));
    }

    #[test]
    fn rejects_long_additional_info() {
        let mut input = valid_input();
        input.additional_info = Some("x".repeat(1001));
        assert!(input.validate().is_err());
        input.additional_info = Some("x".repeat(1000));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn budget_pattern_compiles() {
        assert!((*BUDGET).as_ref().is_ok_and(|re| re.is_match("$5,000")));
    }

    #[test]
    fn budget_formats() {
        for ok in ["5000", "$5000", "$5,000", "1500.50"] {
            let mut input = valid_input();
            input.monthly_budget = ok.into();
            assert!(input.validate().is_ok(), "{ok} should be accepted");
        }
        for bad in ["five thousand", "$", "5,000,000", "-200", "$ 500"] {
            let mut input = valid_input();
            input.monthly_budget = bad.into();
            assert!(
                matches!(
                    input.validate(),
                    Err(ValidationError::Format {
                        field: "monthly_budget",
                        ..
                    })
                ),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn profile_preserves_input() {
        let input = valid_input();
        let profile = BusinessProfile::new(input.clone());
        assert_eq!(profile.business_type, input.business_type);
        assert_eq!(profile.target_market, input.target_market);
        assert_eq!(profile.monthly_budget, input.monthly_budget);
        assert_eq!(profile.primary_goal, input.primary_goal);
        assert_eq!(profile.additional_info, input.additional_info);
    }

    proptest! {
        #[test]
        fn plain_dollar_amounts_always_pass(amount in 0u64..10_000_000) {
            let mut input = valid_input();
            input.monthly_budget = format!("${amount}");
            prop_assert!(input.validate().is_ok());
        }

        #[test]
        fn goal_length_bounds_hold(len in 0usize..600) {
            let mut input = valid_input();
            input.primary_goal = "g".repeat(len);
            prop_assert_eq!(input.validate().is_ok(), (10..=500).contains(&len));
        }
    }
}
