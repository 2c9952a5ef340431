use flowloom_core::{Workflow, repair_workflow};
use tracing::{debug, info};

use crate::client::{
    ENGINE_HOSTED, ENGINE_LOCAL, HostedBackend, LlmConfig, LocalBackend, ModelBackend,
};
use crate::error::GenerateError;
use crate::extract::extract_json_object;
use crate::prompt::{build_user_prompt, workflow_system_prompt};

/// Turns natural-language descriptions into repaired workflow graphs.
///
/// Holds the read-only backend configuration and a shared HTTP client.
/// Every call is independent and issues exactly one backend request.
pub struct Generator {
    config: LlmConfig,
    http: reqwest::Client,
}

impl Generator {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    /// Generate a workflow for `description` on the requested backend.
    pub async fn generate(
        &self,
        description: &str,
        engine: Option<&str>,
        model: Option<&str>,
    ) -> Result<Workflow, GenerateError> {
        match self.resolve_backend(engine, model)? {
            ResolvedBackend::Local(backend) => generate_with_backend(&backend, description).await,
            ResolvedBackend::Hosted(backend) => generate_with_backend(&backend, description).await,
        }
    }

    /// Resolve the engine name and model choice to a concrete backend.
    ///
    /// An unrecognized engine silently selects the local backend with its
    /// default model, even when a model was requested explicitly. The
    /// hosted credential is checked here, before any request exists.
    pub(crate) fn resolve_backend(
        &self,
        engine: Option<&str>,
        model: Option<&str>,
    ) -> Result<ResolvedBackend, GenerateError> {
        let engine = engine.unwrap_or(&self.config.default_engine);
        match engine {
            ENGINE_LOCAL => Ok(ResolvedBackend::Local(LocalBackend::new(
                self.http.clone(),
                self.config.local_url.clone(),
                model.unwrap_or(&self.config.local_model).to_string(),
            ))),
            ENGINE_HOSTED => Ok(ResolvedBackend::Hosted(HostedBackend::from_config(
                self.http.clone(),
                &self.config,
                model.unwrap_or(&self.config.hosted_model).to_string(),
            )?)),
            other => {
                debug!("unrecognized engine `{other}`; falling back to the local backend");
                Ok(ResolvedBackend::Local(LocalBackend::new(
                    self.http.clone(),
                    self.config.local_url.clone(),
                    self.config.local_model.clone(),
                )))
            }
        }
    }
}

#[derive(Debug)]
pub(crate) enum ResolvedBackend {
    Local(LocalBackend),
    Hosted(HostedBackend),
}

/// Prompt → backend → extract → repair.
///
/// The backend-generic seam: `Generator::generate` is the production
/// entry, tests drive this directly with a mock backend. Repair always
/// follows a successful extraction; an extraction failure fails the
/// whole operation and no repair is attempted.
pub async fn generate_with_backend(
    backend: &impl ModelBackend,
    description: &str,
) -> Result<Workflow, GenerateError> {
    info!("generating workflow with model {}", backend.model_name());

    let system = workflow_system_prompt();
    let user = build_user_prompt(description);
    let raw = backend.complete(&system, &user).await?;
    debug!("raw model output: {raw}");

    let candidate = extract_json_object(&raw)?;
    Ok(repair_workflow(&candidate))
}
