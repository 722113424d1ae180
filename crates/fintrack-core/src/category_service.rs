use tracing::info;
use uuid::Uuid;

use fintrack_domain::{ExpenseCategory, FinanceState};

use crate::{
    validation::{same_name, validate_amount, validate_name},
    CoreError, CoreResult,
};

/// Create, update, and delete expense categories.
///
/// Category changes never touch the monthly cache.
pub struct CategoryService;

impl CategoryService {
    pub fn add(state: &FinanceState, category: ExpenseCategory) -> CoreResult<FinanceState> {
        Self::validate(state, None, &category)?;
        let mut next = state.clone();
        info!(id = %category.id, name = %category.name, "adding category");
        next.expense_categories.push(category);
        next.touch();
        Ok(next)
    }

    /// Replaces every field of the category `id` except the id itself.
    pub fn update(
        state: &FinanceState,
        id: Uuid,
        changes: ExpenseCategory,
    ) -> CoreResult<FinanceState> {
        if state.category(id).is_none() {
            return Err(CoreError::CategoryNotFound(id));
        }
        Self::validate(state, Some(id), &changes)?;
        let mut next = state.clone();
        let category = next
            .category_mut(id)
            .ok_or(CoreError::CategoryNotFound(id))?;
        category.name = changes.name;
        category.color = changes.color;
        category.budget = changes.budget;
        category.periodicity = changes.periodicity;
        next.touch();
        info!(%id, "updated category");
        Ok(next)
    }

    pub fn set_budget(state: &FinanceState, id: Uuid, budget: f64) -> CoreResult<FinanceState> {
        validate_amount("Budget", budget)?;
        let mut next = state.clone();
        let category = next
            .category_mut(id)
            .ok_or(CoreError::CategoryNotFound(id))?;
        category.budget = budget;
        next.touch();
        info!(%id, budget, "set category budget");
        Ok(next)
    }

    /// Removes a category. Refused while any expense still references it.
    pub fn delete(state: &FinanceState, id: Uuid) -> CoreResult<FinanceState> {
        if state.category(id).is_none() {
            return Err(CoreError::CategoryNotFound(id));
        }
        let linked = state
            .expenses
            .iter()
            .filter(|expense| expense.category_id == id)
            .count();
        if linked > 0 {
            return Err(CoreError::CategoryInUse {
                id,
                expenses: linked,
            });
        }
        let mut next = state.clone();
        next.expense_categories.retain(|category| category.id != id);
        next.touch();
        info!(%id, "deleted category");
        Ok(next)
    }

    pub fn list(state: &FinanceState) -> Vec<&ExpenseCategory> {
        state.expense_categories.iter().collect()
    }

    pub fn find_by_name<'a>(state: &'a FinanceState, name: &str) -> Option<&'a ExpenseCategory> {
        state
            .expense_categories
            .iter()
            .find(|category| same_name(&category.name, name))
    }

    fn validate(
        state: &FinanceState,
        exclude: Option<Uuid>,
        category: &ExpenseCategory,
    ) -> CoreResult<()> {
        validate_name("Category", &category.name)?;
        validate_amount("Budget", category.budget)?;
        let duplicate = state.expense_categories.iter().any(|existing| {
            same_name(&existing.name, &category.name) && exclude.map_or(true, |id| existing.id != id)
        });
        if duplicate {
            return Err(CoreError::Validation(format!(
                "Category `{}` already exists",
                category.name
            )));
        }
        Ok(())
    }
}
