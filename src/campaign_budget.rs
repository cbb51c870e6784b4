use crate::errors::AdsError;
use crate::money::euro_to_micro;
use crate::operations::{Budget, Money, Operation, Operator};
use crate::temp_id::TempId;

/// Daily campaign budget, non-shared and delivered evenly.
#[derive(Debug, Clone, PartialEq)]
pub struct CampaignBudget {
    /// Amount in currency units.
    pub amount: f64,
    pub micro_amount: i64,
}

impl CampaignBudget {
    pub fn new(amount: f64) -> Result<Self, AdsError> {
        if !amount.is_finite() || amount <= 0.0 {
            return Err(AdsError::validation(format!(
                "budget amount must be positive, got {}",
                amount
            )));
        }

        Ok(Self {
            amount,
            micro_amount: euro_to_micro(amount),
        })
    }

    /// Creates the budget under a temp id so a campaign in the same batch can use it.
    pub fn add_operation(&self, temp_id: TempId, name: Option<&str>) -> Operation {
        Operation::Budget {
            operator: Operator::Add,
            operand: Budget {
                budget_id: temp_id.get(),
                name: name.map(str::to_string),
                amount: Some(Money {
                    micro_amount: self.micro_amount,
                }),
                delivery_method: Some("STANDARD".to_string()),
                is_explicitly_shared: Some(false),
            },
        }
    }

    pub fn set_amount_operation(budget_id: i64, amount: f64) -> Result<Operation, AdsError> {
        let budget = Self::new(amount)?;

        Ok(Operation::Budget {
            operator: Operator::Set,
            operand: Budget {
                budget_id,
                amount: Some(Money {
                    micro_amount: budget.micro_amount,
                }),
                ..Default::default()
            },
        })
    }

    pub fn delete_operation(budget_id: i64) -> Operation {
        Operation::Budget {
            operator: Operator::Remove,
            operand: Budget {
                budget_id,
                ..Default::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::MICRO_FACTOR;
    use crate::temp_id::TempIdAllocator;
    use serde_json::json;

    #[test]
    fn test_budget_amounts() {
        let budget = CampaignBudget::new(200.0).unwrap();
        assert_eq!(budget.amount, 200.0);
        assert_eq!(budget.micro_amount, 200 * MICRO_FACTOR);

        assert!(CampaignBudget::new(0.0).is_err());
        assert!(CampaignBudget::new(f64::NAN).is_err());
    }

    #[test]
    fn test_add_with_temp_id() {
        let mut ids = TempIdAllocator::new();
        let op = CampaignBudget::new(12.5)
            .unwrap()
            .add_operation(ids.next_id(), None);

        assert_eq!(
            serde_json::to_value(op).unwrap(),
            json!({
                "xsi_type": "BudgetOperation",
                "operator": "ADD",
                "operand": {
                    "budgetId": -1,
                    "amount": {"xsi_type": "Money", "microAmount": 12_500_000},
                    "deliveryMethod": "STANDARD",
                    "isExplicitlyShared": false
                }
            })
        );
    }
}
