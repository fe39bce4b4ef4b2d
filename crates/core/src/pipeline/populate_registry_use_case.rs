use crate::pipeline::pipeline_logger::PipelineLogger;
use crate::registry::domain::face_registry::FaceRegistry;
use crate::shared::headshot_name::display_name;
use crate::storage::domain::headshot_source::HeadshotSource;

/// Counts for one population run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PopulateReport {
    pub registered: usize,
    pub skipped: usize,
}

/// Rebuilds the identity group from scratch out of the headshot source.
///
/// Drops any existing group, recreates it, registers one person with one
/// reference face per headshot, then requests training. Headshots whose
/// file name yields no display name are skipped with a warning.
pub struct PopulateRegistryUseCase {
    registry: Box<dyn FaceRegistry>,
    source: Box<dyn HeadshotSource>,
    group_id: String,
    group_user_data: String,
    train: bool,
    logger: Box<dyn PipelineLogger>,
}

impl PopulateRegistryUseCase {
    pub fn new(
        registry: Box<dyn FaceRegistry>,
        source: Box<dyn HeadshotSource>,
        group_id: &str,
        logger: Box<dyn PipelineLogger>,
    ) -> Self {
        Self {
            registry,
            source,
            group_id: group_id.to_string(),
            group_user_data: String::new(),
            train: true,
            logger,
        }
    }

    pub fn with_group_user_data(mut self, user_data: &str) -> Self {
        self.group_user_data = user_data.to_string();
        self
    }

    /// Skip the final training request.
    pub fn without_training(mut self) -> Self {
        self.train = false;
        self
    }

    pub fn execute(&mut self) -> Result<PopulateReport, Box<dyn std::error::Error>> {
        self.registry.delete_group(&self.group_id)?;
        self.registry
            .create_group(&self.group_id, &self.group_user_data)?;

        let groups = self.registry.list_groups()?;
        let ids: Vec<&str> = groups.iter().map(|g| g.person_group_id.as_str()).collect();
        self.logger
            .info(&format!("Registry groups: [{}]", ids.join(", ")));

        let headshots = self.source.headshots()?;
        let mut report = PopulateReport::default();

        for (i, headshot) in headshots.iter().enumerate() {
            self.logger.progress(i + 1, headshots.len());
            let name = match display_name(&headshot.file_name) {
                Ok(name) => name,
                Err(e) => {
                    log::warn!("Skipping headshot: {e}");
                    self.logger.outcome("skipped");
                    report.skipped += 1;
                    continue;
                }
            };

            let person_id = self.registry.add_person(&self.group_id, &name, "")?;
            self.registry
                .add_face(&self.group_id, &person_id, &headshot.url)?;
            log::debug!("Registered {name} as {person_id}");
            self.logger.outcome("registered");
            report.registered += 1;
        }

        if self.train {
            self.registry.train(&self.group_id)?;
            self.logger
                .info(&format!("Training requested for group {}", self.group_id));
        }

        self.logger.summary();
        Ok(report)
    }
}
