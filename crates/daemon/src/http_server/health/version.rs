use axum::Json;

use common::prelude::BuildInfo;

pub async fn handler() -> Json<BuildInfo> {
    Json(common::build_info!())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_reports_daemon_build() {
        let Json(info) = handler().await;
        assert_eq!(info.name, "shelf-daemon");
    }
}
