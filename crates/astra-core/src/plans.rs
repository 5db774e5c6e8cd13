//! Subscription plan catalogue served by `GET /api/plans`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A monthly price, or a label such as `"Custom"` for negotiated plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PlanPrice {
    Monthly(u32),
    Label(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Plan {
    pub id: String,
    pub name: String,
    pub price: PlanPrice,
    pub period: String,
    pub features: Vec<String>,
    pub color: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub popular: bool,
}

fn plan(id: &str, name: &str, price: PlanPrice, period: &str, features: &[&str], color: &str) -> Plan {
    Plan {
        id: id.into(),
        name: name.into(),
        price,
        period: period.into(),
        features: features.iter().map(|f| f.to_string()).collect(),
        color: color.into(),
        popular: false,
    }
}

/// All plans, cheapest first.
pub fn catalogue() -> Vec<Plan> {
    vec![
        plan(
            "starter",
            "Starter",
            PlanPrice::Monthly(19),
            "month",
            &["Basic marketing strategies", "Limited reports", "5 analyses/month"],
            "green",
        ),
        Plan {
            popular: true,
            ..plan(
                "pro",
                "Pro",
                PlanPrice::Monthly(49),
                "month",
                &[
                    "Full marketing + data analysis",
                    "Business plans",
                    "Competitor research",
                    "30 analyses/month",
                    "Live market data",
                    "PDF exports",
                ],
                "blue",
            )
        },
        plan(
            "growth",
            "Growth",
            PlanPrice::Monthly(99),
            "month",
            &[
                "Advanced analytics",
                "Revenue forecasting",
                "Automation planning",
                "Export reports (PDF/Excel)",
                "100 analyses/month",
                "Pitch deck generator",
                "Content calendar",
                "Email sequences",
            ],
            "purple",
        ),
        plan(
            "enterprise",
            "Enterprise",
            PlanPrice::Label("Custom".into()),
            "",
            &[
                "API access",
                "Team accounts",
                "Custom AI tuning",
                "White-label reports",
                "Blockchain verification",
                "24/7 support",
            ],
            "slate",
        ),
    ]
}
