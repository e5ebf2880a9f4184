//! Named groups on top of a bin-set registry

use crate::error::CtlError;
use palloc_common::config::PallocConfig;
use palloc_registry::{FileKind, GroupId, Registry, SubsystemHooks};
use tracing::{debug, info};

/// Registry plus the operator's names for its groups
///
/// Groups keep their creation order for reporting.
#[derive(Debug)]
pub struct ControlSession {
    registry: Registry,
    groups: Vec<(String, GroupId)>,
}

impl ControlSession {
    /// Empty session over `registry`
    pub fn new(registry: Registry) -> Self {
        Self {
            registry,
            groups: Vec::new(),
        }
    }

    /// Validate `config`, create its groups and apply their initial bins
    pub fn from_config(config: &PallocConfig) -> Result<Self, CtlError> {
        config.validate()?;
        let mut session = Self::new(Registry::new(config.registry)?);
        info!(
            service = %config.shared.service_name,
            bins = config.registry.bins.get(),
            groups = config.groups.len(),
            "registry configured"
        );

        for group in &config.groups {
            session.create_group(&group.name)?;
            session.set_bins(&group.name, &group.bins)?;
        }
        Ok(session)
    }

    /// Underlying registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Handle of a named group
    pub fn group(&self, name: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|(n, _)| n == name)
            .map(|&(_, id)| id)
    }

    /// Create a named group with no bins; existing names are returned as is
    pub fn create_group(&mut self, name: &str) -> Result<GroupId, CtlError> {
        if let Some(id) = self.group(name) {
            return Ok(id);
        }
        let id = self.registry.create().map_err(|source| CtlError::Group {
            name: name.to_string(),
            source,
        })?;
        debug!(group = name, id = %id, "group created");
        self.groups.push((name.to_string(), id));
        Ok(id)
    }

    /// Destroy a named group
    pub fn remove_group(&mut self, name: &str) -> Result<(), CtlError> {
        let pos = self
            .groups
            .iter()
            .position(|(n, _)| n == name)
            .ok_or_else(|| CtlError::UnknownGroup(name.to_string()))?;
        let (_, id) = self.groups.remove(pos);
        self.registry.destroy(id);
        Ok(())
    }

    /// Write a group's `bins` file, returning the bytes consumed
    pub fn set_bins(&self, name: &str, bins: &str) -> Result<usize, CtlError> {
        let id = self.resolve(name)?;
        self.registry
            .write(id, FileKind::Bins, bins)
            .map_err(|source| CtlError::Group {
                name: name.to_string(),
                source,
            })
    }

    /// Read a group's `bins` file without the trailing newline
    pub fn bins(&self, name: &str) -> Result<String, CtlError> {
        let id = self.resolve(name)?;
        let mut text = self
            .registry
            .read(id, FileKind::Bins)
            .map_err(|source| CtlError::Group {
                name: name.to_string(),
                source,
            })?;
        text.truncate(text.trim_end().len());
        Ok(text)
    }

    /// `name: bins` line per group in creation order
    pub fn report(&self) -> Result<Vec<String>, CtlError> {
        self.groups
            .iter()
            .map(|(name, _)| Ok(format!("{name}: {}", self.bins(name)?)))
            .collect()
    }

    fn resolve(&self, name: &str) -> Result<GroupId, CtlError> {
        self.group(name)
            .ok_or_else(|| CtlError::UnknownGroup(name.to_string()))
    }
}

/// Parse a `NAME=BINS` command-line assignment
pub fn parse_assignment(s: &str) -> Result<(String, String), String> {
    let (name, bins) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=BINS, got {s:?}"))?;
    if name.is_empty() {
        return Err(format!("empty group name in {s:?}"));
    }
    Ok((name.to_string(), bins.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use palloc_common::config::BinCapacity;
    use palloc_registry::PallocError;

    fn session() -> ControlSession {
        ControlSession::new(Registry::with_capacity(BinCapacity::new(16).unwrap()))
    }

    #[test]
    fn test_parse_assignment() {
        assert_eq!(
            parse_assignment("rt=0-3").unwrap(),
            ("rt".to_string(), "0-3".to_string())
        );
        assert_eq!(
            parse_assignment("idle=").unwrap(),
            ("idle".to_string(), String::new())
        );
        assert!(parse_assignment("rt").is_err());
        assert!(parse_assignment("=0-3").is_err());
    }

    #[test]
    fn test_create_is_idempotent_per_name() {
        let mut session = session();
        let a = session.create_group("rt").unwrap();
        assert_eq!(session.create_group("rt").unwrap(), a);
        assert_eq!(session.registry().len(), 1);
    }

    #[test]
    fn test_set_and_report() {
        let mut session = session();
        session.create_group("rt").unwrap();
        session.create_group("batch").unwrap();
        session.set_bins("rt", "3,2,1,0").unwrap();
        session.set_bins("batch", "8-15").unwrap();

        assert_eq!(
            session.report().unwrap(),
            vec!["rt: 0-3".to_string(), "batch: 8-15".to_string()]
        );
    }

    #[test]
    fn test_errors_carry_group_name() {
        let mut session = session();
        session.create_group("rt").unwrap();

        let err = session.set_bins("rt", "16").unwrap_err();
        assert!(err.to_string().starts_with("group 'rt':"));
        assert!(matches!(
            err,
            CtlError::Group {
                source: PallocError::Parse(_),
                ..
            }
        ));
        assert!(matches!(
            session.set_bins("other", "0"),
            Err(CtlError::UnknownGroup(_))
        ));
    }

    #[test]
    fn test_remove_group() {
        let mut session = session();
        let id = session.create_group("rt").unwrap();
        session.remove_group("rt").unwrap();

        assert!(session.group("rt").is_none());
        assert!(!session.registry().contains(id));
        assert!(session.remove_group("rt").is_err());
    }
}
