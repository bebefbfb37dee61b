//! Demo service - switch demo mode on and off
//!
//! Demo mode keeps its state in demo.duckdb and talks to the demo health
//! source and mood endpoint, so the real state file is never touched.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::config::Config;

const DEMO_DB: &str = "demo.duckdb";
const DEMO_WAL: &str = "demo.duckdb.wal";

pub struct DemoService {
    data_dir: PathBuf,
}

impl DemoService {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
        }
    }

    pub fn is_enabled(&self) -> Result<bool> {
        Ok(Config::load(&self.data_dir)?.demo_mode)
    }

    /// Turn demo mode on with a fresh demo database
    pub fn enable(&self) -> Result<()> {
        self.remove_demo_files()?;
        let mut config = Config::load(&self.data_dir).unwrap_or_default();
        config.enable_demo_mode();
        config.save(&self.data_dir)
    }

    /// Turn demo mode off, optionally deleting the demo database
    pub fn disable(&self, clean: bool) -> Result<()> {
        let mut config = Config::load(&self.data_dir).unwrap_or_default();
        config.disable_demo_mode();
        config.save(&self.data_dir)?;

        if clean {
            self.remove_demo_files()?;
        }
        Ok(())
    }

    fn remove_demo_files(&self) -> Result<()> {
        for name in [DEMO_DB, DEMO_WAL] {
            let path = self.data_dir.join(name);
            if path.exists() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }
}
