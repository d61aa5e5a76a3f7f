//! Page view builder: a UI page opened by a user plus the server-side
//! rendering call it triggers

use super::{fresh_context, BuildError, BuildRequest, ItemBuilder};
use crate::domain::errors::ValidationError;
use crate::domain::event::TelemetryEvent;
use crate::domain::identifiers::{
    DelayMillis, DependencyData, DependencyName, OperationDuration, PageName, PageType,
};
use std::borrow::Cow;

/// Name of the dependency emitted for every page view
pub const OPEN_FORM: &str = "OpenForm";

/// Fraction of the client-only time after which the server call starts
const DEPENDENCY_START_RATIO: f64 = 0.3;

/// Duration ranges of one page family, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioTemplate {
    pub page: &'static str,
    pub page_type: &'static str,
    pub min_duration: u64,
    pub max_duration: u64,
    pub min_server_duration: f64,
    pub max_server_duration: f64,
}

impl ScenarioTemplate {
    const fn new(
        page: &'static str,
        page_type: &'static str,
        min_duration: u64,
        max_duration: u64,
        min_server_duration: f64,
        max_server_duration: f64,
    ) -> Self {
        Self {
            page,
            page_type,
            min_duration,
            max_duration,
            min_server_duration,
            max_server_duration,
        }
    }

    fn validate(&self) -> Result<(), BuildError> {
        let invalid = |reason: &str| BuildError::InvalidTemplate {
            page: self.page.to_string(),
            reason: reason.to_string(),
        };
        if self.page.is_empty() || self.page_type.is_empty() {
            return Err(invalid("page name and type must not be empty"));
        }
        if self.min_duration == 0 || self.max_duration == 0 {
            return Err(invalid("page durations must be positive"));
        }
        if !(self.min_server_duration.is_finite() && self.min_server_duration > 0.0)
            || !(self.max_server_duration.is_finite() && self.max_server_duration > 0.0)
        {
            return Err(invalid("server durations must be positive"));
        }
        Ok(())
    }
}

/// Built-in page families; server ranges always stay below the page minimum
pub const DEFAULT_CATALOG: &[ScenarioTemplate] = &[
    ScenarioTemplate::new("Sales order list", "List", 1, 4, 0.4, 0.8),
    ScenarioTemplate::new("Sales order card", "Card", 1, 2, 0.5, 0.6),
    ScenarioTemplate::new("Purchase order list", "List", 2, 6, 1.5, 1.7),
    ScenarioTemplate::new("Purchase order card", "Card", 1, 3, 0.5, 0.7),
    ScenarioTemplate::new("Item list", "List", 3, 8, 2.5, 2.9),
    ScenarioTemplate::new("Item card", "Card", 1, 2, 0.4, 0.7),
];

/// Durations and dependency offset derived for one request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timings {
    pub page_duration: f64,
    pub server_duration: f64,
    pub dependency_delay: u64,
}

impl Timings {
    /// Derive the timings of `template` for a request at `delay`
    ///
    /// The dependency starts 30% of the way into the client-only part of the
    /// page duration and must finish before the page view does.
    pub fn derive(
        template: &ScenarioTemplate,
        delay: u64,
        duration_seed: u64,
    ) -> Result<Self, BuildError> {
        let page_duration = template
            .min_duration
            .max(duration_seed % template.max_duration) as f64;
        let server_duration = template
            .min_server_duration
            .max(duration_seed as f64 % template.max_server_duration);

        if page_duration <= server_duration {
            return Err(BuildError::Consistency {
                page: template.page.to_string(),
                page_duration,
                server_duration,
            });
        }

        let client_only_ms = (page_duration - server_duration) * DEPENDENCY_START_RATIO * 1000.0;
        let dependency_delay = delay + client_only_ms.floor() as u64;

        let dependency_end_ms = dependency_delay as f64 + server_duration * 1000.0;
        let page_end_ms = delay as f64 + page_duration * 1000.0;
        if dependency_end_ms >= page_end_ms {
            return Err(BuildError::DependencyOutlastsPage {
                page: template.page.to_string(),
                dependency_end_ms,
                page_end_ms,
            });
        }

        Ok(Self {
            page_duration,
            server_duration,
            dependency_delay,
        })
    }
}

/// Emits `[page view, OpenForm dependency]` for a template picked by seed
#[derive(Debug, Clone)]
pub struct PageViewBuilder {
    catalog: Cow<'static, [ScenarioTemplate]>,
}

impl PageViewBuilder {
    pub fn new() -> Self {
        Self {
            catalog: Cow::Borrowed(DEFAULT_CATALOG),
        }
    }

    /// Use a custom catalog; every template is checked up front
    pub fn with_catalog(catalog: Vec<ScenarioTemplate>) -> Result<Self, BuildError> {
        if catalog.is_empty() {
            return Err(BuildError::EmptyCatalog);
        }
        catalog.iter().try_for_each(ScenarioTemplate::validate)?;
        Ok(Self {
            catalog: Cow::Owned(catalog),
        })
    }

    pub fn template_for(&self, operation_seed: u32) -> &ScenarioTemplate {
        &self.catalog[operation_seed as usize % self.catalog.len()]
    }
}

impl Default for PageViewBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ItemBuilder for PageViewBuilder {
    fn name(&self) -> &'static str {
        "page_view"
    }

    fn build(&self, request: &BuildRequest) -> Result<Vec<TelemetryEvent>, BuildError> {
        let template = self.template_for(request.operation_seed);
        let timings = Timings::derive(template, request.delay, request.duration_seed)?;

        let page_view = TelemetryEvent::page_view(
            DelayMillis::try_new(request.delay).map_err(ValidationError::for_field("delay"))?,
            PageName::try_new(template.page.to_string())
                .map_err(ValidationError::for_field("page_name"))?,
            PageType::try_new(template.page_type.to_string())
                .map_err(ValidationError::for_field("page_type"))?,
            fresh_context(request)?,
            OperationDuration::from_secs_f64(timings.page_duration)?,
        );

        let dependency = TelemetryEvent::dependency_of(
            &page_view,
            DelayMillis::try_new(timings.dependency_delay)
                .map_err(ValidationError::for_field("delay"))?,
            DependencyName::try_new(OPEN_FORM.to_string())
                .map_err(ValidationError::for_field("dependency_name"))?,
            DependencyData::try_new(format!(
                "Form: {} - Type: {}",
                template.page, template.page_type
            ))
            .map_err(ValidationError::for_field("dependency_data"))?,
            OperationDuration::from_secs_f64(timings.server_duration)?,
        );

        Ok(vec![page_view, dependency])
    }
}
