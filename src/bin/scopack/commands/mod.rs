//! Command implementations

pub mod completions;
pub mod convert;
pub mod map;
pub mod resolve;
pub mod tree;

use std::sync::Arc;

use scopack::ops::ResolveEvent;
use scopack::util::shell::Progress;
use scopack::util::{Shell, Status};

/// Progress bar driven by resolution events.
pub struct UnitProgress<'s> {
    shell: &'s Arc<Shell>,
    progress: Option<Progress>,
}

impl<'s> UnitProgress<'s> {
    pub fn new(shell: &'s Arc<Shell>) -> Self {
        UnitProgress {
            shell,
            progress: None,
        }
    }

    pub fn update(&mut self, event: ResolveEvent<'_>) {
        match event {
            ResolveEvent::Started { units } => {
                self.shell.status(Status::Resolving, format!("{} units", units));
                self.progress = Some(self.shell.progress(units as u64, "Resolving"));
            }
            ResolveEvent::Unit(unit) => {
                if let Some(progress) = &mut self.progress {
                    progress.inc(unit);
                }
            }
        }
    }

    pub fn finish(&self) {
        if let Some(progress) = &self.progress {
            progress.finish();
        }
    }
}
