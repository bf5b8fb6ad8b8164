use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tabled::Table;

use crate::{
    error, info,
    service::TitledService,
    success,
    types::{GeneratedPlaylist, ResolvedTableRow},
    utils, warning,
};

pub async fn generate(service: &TitledService, album: &str, user_id: &str, no_cache: bool, open: bool) {
    let album_id = match utils::parse_album_id(album) {
        Ok(id) => id,
        Err(e) => error!("{}", e),
    };

    let user = match service.refresh_user(user_id).await {
        Ok(user) => user,
        Err(e) => error!(
            "Cannot get an access token for user {}. Sign in through `titled serve` first.\n Error: {}",
            user_id,
            e
        ),
    };

    let pb = ProgressBar::new_spinner();
    pb.set_message(format!("Looking for samples on album {}...", album_id));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_style(
        ProgressStyle::with_template("{spinner:.blue} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
    );

    let result = if no_cache {
        service
            .generate_playlist_uncached(&album_id, &user.id, &user.access_token)
            .await
    } else {
        service
            .generate_playlist(&album_id, &user.id, &user.access_token)
            .await
    };
    pb.finish_and_clear();

    let generated = match result {
        Ok(generated) => generated,
        Err(e) => error!("Failed to generate playlist: {}", e),
    };

    print_summary(&generated);
    success!(
        "Playlist created with {} tracks: {}",
        generated.uris.len(),
        generated.playlist.external_url
    );

    if open && webbrowser::open(&generated.playlist.external_url).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            generated.playlist.external_url
        );
    }
}

fn print_summary(generated: &GeneratedPlaylist) {
    if generated.from_cache {
        info!(
            "Reused {} cached tracks for {}",
            generated.uris.len(),
            generated.album_name
        );
        return;
    }

    let rows: Vec<ResolvedTableRow> = generated
        .pairs
        .iter()
        .map(|pair| ResolvedTableRow {
            position: pair.index + 1,
            track: pair.original_uri.clone(),
            sample: match (&pair.candidate, &pair.sampled_uri) {
                (Some(candidate), Some(uri)) => format!("{} ({})", candidate.label(), uri),
                _ => "-".to_string(),
            },
        })
        .collect();

    let sampled = generated
        .pairs
        .iter()
        .filter(|p| p.sampled_uri.is_some())
        .count();

    println!("{}", Table::new(rows));
    info!(
        "Found samples for {} of {} tracks on {}",
        sampled,
        generated.pairs.len(),
        generated.album_name
    );
}
