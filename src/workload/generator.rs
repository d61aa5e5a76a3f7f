use crate::builders::{BuildError, BuildRequest, ItemBuilder, PageViewBuilder};
use crate::domain::config_types::{DrawBound, NodeCount, RunWindowMillis, UsersPerTenant};
use crate::domain::event::TelemetryEvent;
use rand::Rng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("no item builder registered")]
    NoBuilders,

    #[error("builder {builder} failed: {source}")]
    Build {
        builder: &'static str,
        #[source]
        source: BuildError,
    },
}

impl GenerationError {
    /// Whether the failure comes from inconsistent catalog numbers
    pub fn is_consistency_fault(&self) -> bool {
        match self {
            GenerationError::Build { source, .. } => source.is_consistency_fault(),
            GenerationError::NoBuilders => false,
        }
    }
}

/// Bounds of the random draws made for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkloadProfile {
    /// Upper bound of event delays and duration seeds; the run window
    pub max_delay: RunWindowMillis,
    pub number_of_nodes: NodeCount,
    pub max_tenants: DrawBound,
    pub max_operations: DrawBound,
    pub users_per_tenant: UsersPerTenant,
    pub max_operation_seed: DrawBound,
}

impl Default for WorkloadProfile {
    fn default() -> Self {
        Self {
            max_delay: RunWindowMillis::default(),
            number_of_nodes: NodeCount::default(),
            max_tenants: DrawBound::try_new(9).expect("Default tenant bound is valid"),
            max_operations: DrawBound::try_new(49).expect("Default operation bound is valid"),
            users_per_tenant: UsersPerTenant::default(),
            max_operation_seed: DrawBound::try_new(99).expect("Default seed bound is valid"),
        }
    }
}

/// One run's dataset, in generation order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workload {
    pub tenant_count: u32,
    pub events: Vec<TelemetryEvent>,
}

/// Drives the tenant/user/operation space over a single random source
pub struct WorkloadGenerator<R> {
    profile: WorkloadProfile,
    rng: R,
    builders: Vec<Box<dyn ItemBuilder>>,
}

impl<R: Rng> WorkloadGenerator<R> {
    pub fn new(
        profile: WorkloadProfile,
        rng: R,
        builders: Vec<Box<dyn ItemBuilder>>,
    ) -> Result<Self, GenerationError> {
        if builders.is_empty() {
            return Err(GenerationError::NoBuilders);
        }
        Ok(Self {
            profile,
            rng,
            builders,
        })
    }

    /// Generator registered with every built-in scenario family
    pub fn with_default_builders(profile: WorkloadProfile, rng: R) -> Self {
        Self {
            profile,
            rng,
            builders: vec![Box::new(PageViewBuilder::new()) as Box<dyn ItemBuilder>],
        }
    }

    pub fn profile(&self) -> &WorkloadProfile {
        &self.profile
    }

    /// Draw a fresh workload
    ///
    /// Tenant `t` owns users `1..=t * users_per_tenant`; a user always talks
    /// to node `user mod number_of_nodes`. The first builder failure aborts
    /// the whole generation.
    pub fn generate(&mut self) -> Result<Workload, GenerationError> {
        let max_delay = self.profile.max_delay.into_inner();
        let nodes = self.profile.number_of_nodes.into_inner();
        let tenant_count = self
            .rng
            .random_range(1..=self.profile.max_tenants.into_inner());
        let mut events = Vec::new();

        for tenant_id in 1..=tenant_count {
            let max_user_id = tenant_id * self.profile.users_per_tenant.into_inner();
            let operations = self
                .rng
                .random_range(1..=self.profile.max_operations.into_inner());

            for _ in 0..operations {
                let user_id = self.rng.random_range(1..=max_user_id);
                let builder = &self.builders[self.rng.random_range(0..self.builders.len())];
                let request = BuildRequest {
                    delay: self.rng.random_range(1..=max_delay),
                    operation_seed: self
                        .rng
                        .random_range(1..=self.profile.max_operation_seed.into_inner()),
                    tenant_id,
                    user_id,
                    node_id: user_id % nodes,
                    duration_seed: self.rng.random_range(1..=max_delay),
                };

                let built = builder
                    .build(&request)
                    .map_err(|source| GenerationError::Build {
                        builder: builder.name(),
                        source,
                    })?;
                events.extend(built);
            }
        }

        Ok(Workload {
            tenant_count,
            events,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn single_tenant_profile() -> WorkloadProfile {
        WorkloadProfile {
            max_tenants: DrawBound::try_new(1).unwrap(),
            ..WorkloadProfile::default()
        }
    }

    fn numeric_suffix(value: &str) -> u32 {
        value.rsplit('_').next().unwrap().parse().unwrap()
    }

    struct CountingBuilder {
        calls: Arc<AtomicUsize>,
    }

    impl ItemBuilder for CountingBuilder {
        fn name(&self) -> &'static str {
            "counting"
        }

        fn build(&self, request: &BuildRequest) -> Result<Vec<TelemetryEvent>, BuildError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            PageViewBuilder::new().build(request)
        }
    }

    struct FailingBuilder;

    impl ItemBuilder for FailingBuilder {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn build(&self, _request: &BuildRequest) -> Result<Vec<TelemetryEvent>, BuildError> {
            Err(BuildError::Consistency {
                page: "Broken".to_string(),
                page_duration: 0.1,
                server_duration: 0.2,
            })
        }
    }

    #[test]
    fn rejects_empty_builder_set() {
        let result = WorkloadGenerator::new(
            WorkloadProfile::default(),
            StdRng::seed_from_u64(1),
            Vec::new(),
        );
        assert!(matches!(result, Err(GenerationError::NoBuilders)));
    }

    #[test]
    fn single_tenant_users_stay_in_range() {
        let profile = single_tenant_profile();
        for seed in 0..20 {
            let mut generator =
                WorkloadGenerator::with_default_builders(profile, StdRng::seed_from_u64(seed));
            let workload = generator.generate().unwrap();

            assert_eq!(workload.tenant_count, 1);
            assert!(!workload.events.is_empty());
            for event in &workload.events {
                let user = numeric_suffix(event.user_id().as_ref());
                let node = numeric_suffix(event.node_id().as_ref());
                assert!(user == 1 || user == 2, "unexpected user {user}");
                assert_eq!(node, user % 5);
                assert_eq!(event.tenant_id().as_ref(), "Tenant_1");
            }
        }
    }

    #[test]
    fn tenant_count_and_delays_respect_profile() {
        let profile = WorkloadProfile::default();
        let mut generator =
            WorkloadGenerator::with_default_builders(profile, StdRng::seed_from_u64(7));

        for _ in 0..10 {
            let workload = generator.generate().unwrap();
            assert!((1..=9).contains(&workload.tenant_count));
            for event in workload.events.iter().filter(|e| e.is_page_view()) {
                assert!((1..=180_000).contains(&event.delay_millis()));
            }
        }
    }

    #[test]
    fn one_operation_yields_one_linked_pair() {
        let profile = WorkloadProfile {
            max_operations: DrawBound::try_new(1).unwrap(),
            ..single_tenant_profile()
        };
        let mut generator =
            WorkloadGenerator::with_default_builders(profile, StdRng::seed_from_u64(3));
        let workload = generator.generate().unwrap();

        assert_eq!(workload.events.len(), 2);
        assert_eq!(
            workload.events[0].operation_id(),
            workload.events[1].operation_id()
        );
    }

    #[test]
    fn same_seed_draws_same_shape() {
        let profile = WorkloadProfile::default();
        let mut first = WorkloadGenerator::with_default_builders(profile, StdRng::seed_from_u64(11));
        let mut second =
            WorkloadGenerator::with_default_builders(profile, StdRng::seed_from_u64(11));

        let a = first.generate().unwrap();
        let b = second.generate().unwrap();
        assert_eq!(a.tenant_count, b.tenant_count);
        let delays = |w: &Workload| w.events.iter().map(|e| e.delay_millis()).collect::<Vec<_>>();
        assert_eq!(delays(&a), delays(&b));
    }

    #[test]
    fn builders_are_picked_at_random() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let builders: Vec<Box<dyn ItemBuilder>> = vec![
            Box::new(CountingBuilder {
                calls: first.clone(),
            }),
            Box::new(CountingBuilder {
                calls: second.clone(),
            }),
        ];
        let mut generator =
            WorkloadGenerator::new(WorkloadProfile::default(), StdRng::seed_from_u64(5), builders)
                .unwrap();

        for _ in 0..5 {
            generator.generate().unwrap();
        }
        assert!(first.load(Ordering::SeqCst) > 0);
        assert!(second.load(Ordering::SeqCst) > 0);
    }

    #[test]
    fn builder_failure_aborts_generation() {
        let mut generator = WorkloadGenerator::new(
            WorkloadProfile::default(),
            StdRng::seed_from_u64(1),
            vec![Box::new(FailingBuilder) as Box<dyn ItemBuilder>],
        )
        .unwrap();

        let err = generator.generate().unwrap_err();
        assert!(err.is_consistency_fault());
        assert!(matches!(
            err,
            GenerationError::Build {
                builder: "failing",
                ..
            }
        ));
    }
}
