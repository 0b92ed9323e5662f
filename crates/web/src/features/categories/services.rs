use std::fmt;

use category_storage::{
    CategoryStore, StorageError,
    dto::category::CreateCategoryRequest,
    models::{Category, CategoryName},
};

use crate::auth::CallerRoles;
use crate::config::{ExistsCheckPolicy, PipelineSettings};
use crate::error::CategoryError;
use crate::gateway::GatewayEvent;

/// Steps of the create-category workflow, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Authorizing,
    Validating,
    CheckingDuplicate,
    Inserting,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Authorizing => "authorizing",
            Self::Validating => "validating",
            Self::CheckingDuplicate => "checking_duplicate",
            Self::Inserting => "inserting",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Create a new category from a gateway event.
///
/// Each stage can end the run; on failure the error is logged with the stage
/// that produced it. Nothing is retried.
pub async fn create_category(
    store: &dyn CategoryStore,
    settings: &PipelineSettings,
    event: &GatewayEvent,
) -> Result<Category, CategoryError> {
    let mut stage = Stage::Start;
    let result = run(store, settings, event, &mut stage).await;

    match &result {
        Ok(category) => {
            tracing::info!(id = category.id, name = %category.name, "Category saved");
        }
        Err(err) if err.is_server_error() => {
            tracing::error!(%stage, error = %err, "Create category failed");
        }
        Err(err) => {
            tracing::warn!(%stage, code = err.code(), "{}", err);
        }
    }

    result
}

async fn run(
    store: &dyn CategoryStore,
    settings: &PipelineSettings,
    event: &GatewayEvent,
    stage: &mut Stage,
) -> Result<Category, CategoryError> {
    *stage = Stage::Authorizing;
    CallerRoles::from_event(event)?.require(&settings.required_role)?;

    *stage = Stage::Validating;
    let name = parse_name(event.body_or_empty())?;

    *stage = Stage::CheckingDuplicate;
    if name_taken(store, &name, settings.exists_policy).await? {
        return Err(CategoryError::DuplicateName);
    }

    *stage = Stage::Inserting;
    let category = store.insert(&name).await?;

    *stage = Stage::Done;
    Ok(category)
}

/// Decode the body and validate the name it carries. Bytes that are not
/// UTF-8 JSON are a malformed request like any other parse failure.
pub fn parse_name(body: &[u8]) -> Result<CategoryName, CategoryError> {
    let request: CreateCategoryRequest =
        serde_json::from_slice(body).map_err(|e| CategoryError::InvalidJson(e.to_string()))?;

    Ok(request.into_category_name()?)
}

async fn name_taken(
    store: &dyn CategoryStore,
    name: &CategoryName,
    policy: ExistsCheckPolicy,
) -> Result<bool, CategoryError> {
    match store.exists(name).await {
        Ok(taken) => Ok(taken),
        Err(err) => on_exists_failure(err, policy),
    }
}

fn on_exists_failure(err: StorageError, policy: ExistsCheckPolicy) -> Result<bool, CategoryError> {
    match policy {
        ExistsCheckPolicy::FailClosed => Err(err.into()),
        ExistsCheckPolicy::FailOpen => {
            tracing::error!(error = %err, "Duplicate check failed, relying on unique constraint");
            Ok(false)
        }
    }
}
