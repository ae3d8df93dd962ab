//! `annals show` - fetch and display one era's narrative
//!
//! Drives a detail view session the same way the gallery would: open the
//! view, show a loading line, then render whatever the view ends up holding.
//! Ctrl-C dismisses the view, which aborts the pending provider call.

use anyhow::{anyhow, Result};
use std::sync::Arc;

use annals_core::{Chronicler, Era, ViewSession, ViewState};

use crate::render;

pub async fn run(chronicler: Chronicler, era: &'static Era, json: bool) -> Result<()> {
    let session = ViewSession::new(Arc::new(chronicler));

    if !json {
        eprintln!("正在查阅古籍... ({})", era.localized_name);
    }

    let mut fetch = session.select(era).await;
    tokio::select! {
        joined = &mut fetch => {
            joined.map_err(|e| anyhow!("Detail fetch task failed: {e}"))?;
        }
        _ = tokio::signal::ctrl_c() => {
            session.dismiss().await;
            tracing::debug!("Detail view for {} dismissed before the fetch resolved", era.id);
            return Err(anyhow!("Cancelled"));
        }
    }

    match session.snapshot().await {
        ViewState::Loaded { era, record } => {
            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                print!("{}", render::RecordView::new(era, &record));
            }
            Ok(())
        }
        ViewState::Failed { message, .. } => {
            eprintln!("{message}");
            eprintln!("返回时间轴: annals list");
            Err(anyhow!("Failed to fetch details for {}", era.name))
        }
        ViewState::Loading { .. } | ViewState::Closed => {
            Err(anyhow!("Detail view closed before the fetch resolved"))
        }
    }
}
