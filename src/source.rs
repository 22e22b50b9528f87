// File: ./src/source.rs
// Data sources for meal plans: the REST API or the built-in demo set
use crate::client::{ApiClient, ApiError, MealQuery};
use crate::lookup::MealIndex;
use crate::model::{Meal, MealPlan, MealPlanId, Participant, User, UserId, demo};
use futures::future::join_all;
use std::future::Future;
use tracing::{info, warn};

pub trait MealPlanSource: Send + Sync {
    fn get_meal_plans(&self) -> impl Future<Output = Result<Vec<MealPlan>, ApiError>> + Send;
    fn get_meal_plan(
        &self,
        id: MealPlanId,
    ) -> impl Future<Output = Result<MealPlan, ApiError>> + Send;
    fn get_meals(&self, query: MealQuery)
    -> impl Future<Output = Result<Vec<Meal>, ApiError>> + Send;
    fn get_users(&self) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send;
    fn get_participants(
        &self,
        plan_id: MealPlanId,
    ) -> impl Future<Output = Result<Vec<Participant>, ApiError>> + Send;
}

impl MealPlanSource for ApiClient {
    fn get_meal_plans(&self) -> impl Future<Output = Result<Vec<MealPlan>, ApiError>> + Send {
        ApiClient::get_meal_plans(self)
    }

    fn get_meal_plan(
        &self,
        id: MealPlanId,
    ) -> impl Future<Output = Result<MealPlan, ApiError>> + Send {
        ApiClient::get_meal_plan(self, id)
    }

    fn get_meals(
        &self,
        query: MealQuery,
    ) -> impl Future<Output = Result<Vec<Meal>, ApiError>> + Send {
        ApiClient::get_meals(self, query)
    }

    fn get_users(&self) -> impl Future<Output = Result<Vec<User>, ApiError>> + Send {
        ApiClient::get_users(self)
    }

    fn get_participants(
        &self,
        plan_id: MealPlanId,
    ) -> impl Future<Output = Result<Vec<Participant>, ApiError>> + Send {
        ApiClient::get_participants(self, plan_id)
    }
}

/// In-memory source backed by the demo data set.
#[derive(Debug, Clone)]
pub struct DemoSource {
    plans: Vec<MealPlan>,
    meals: Vec<Meal>,
    users: Vec<User>,
    participants: Vec<Participant>,
}

impl Default for DemoSource {
    fn default() -> Self {
        Self {
            plans: demo::meal_plans(),
            meals: demo::meals(),
            users: demo::users(),
            participants: demo::participants(),
        }
    }
}

impl DemoSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MealPlanSource for DemoSource {
    async fn get_meal_plans(&self) -> Result<Vec<MealPlan>, ApiError> {
        Ok(self.plans.clone())
    }

    async fn get_meal_plan(&self, id: MealPlanId) -> Result<MealPlan, ApiError> {
        self.plans
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("/meal_plans/{}", id)))
    }

    async fn get_meals(&self, query: MealQuery) -> Result<Vec<Meal>, ApiError> {
        Ok(self
            .meals
            .iter()
            .filter(|m| query.matches(m))
            .cloned()
            .collect())
    }

    async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        Ok(self.users.clone())
    }

    async fn get_participants(&self, plan_id: MealPlanId) -> Result<Vec<Participant>, ApiError> {
        Ok(self
            .participants
            .iter()
            .filter(|p| p.meal_plan_id == plan_id)
            .cloned()
            .collect())
    }
}

/// Everything the week view needs for one plan.
#[derive(Debug, Clone)]
pub struct PlanSnapshot {
    pub plan: MealPlan,
    pub index: MealIndex,
    pub participants: Vec<Participant>,
}

/// Loads a plan with its meals, users and participants. The plan and its
/// meals are required; users and participants degrade to empty lists.
pub async fn fetch_snapshot<S: MealPlanSource>(
    source: &S,
    plan_id: MealPlanId,
) -> Result<PlanSnapshot, ApiError> {
    let (plan, meals, users, participants) = tokio::join!(
        source.get_meal_plan(plan_id),
        source.get_meals(MealQuery::for_plan(plan_id)),
        source.get_users(),
        source.get_participants(plan_id),
    );
    let plan = plan?;
    let meals = meals?;
    let users = users.unwrap_or_else(|e| {
        warn!("Could not load users: {}", e);
        Vec::new()
    });
    let participants = participants.unwrap_or_else(|e| {
        warn!("Could not load participants for plan {}: {}", plan_id, e);
        Vec::new()
    });

    info!(
        "Loaded plan {} '{}' with {} meals, {} users",
        plan.id,
        plan.title,
        meals.len(),
        users.len()
    );
    Ok(PlanSnapshot {
        index: MealIndex::for_plan(plan.id, meals, users),
        plan,
        participants,
    })
}

/// Plans the user owns or participates in, ordered by start date. A shared
/// plan whose participants cannot be fetched is left out.
pub async fn accessible_plans<S: MealPlanSource>(
    source: &S,
    user_id: UserId,
) -> Result<Vec<MealPlan>, ApiError> {
    let (mut accessible, shared): (Vec<_>, Vec<_>) = source
        .get_meal_plans()
        .await?
        .into_iter()
        .partition(|plan| plan.owner_id == user_id);

    let lookups = shared.iter().map(|plan| source.get_participants(plan.id));
    let results = join_all(lookups).await;
    for (plan, result) in shared.into_iter().zip(results) {
        match result {
            Ok(participants) if participants.iter().any(|p| p.user_id == user_id) => {
                accessible.push(plan)
            }
            Ok(_) => {}
            Err(e) => warn!("Skipping plan {}: participants unavailable: {}", plan.id, e),
        }
    }
    accessible.sort_by_key(|p| (p.start_date, p.id));
    Ok(accessible)
}
