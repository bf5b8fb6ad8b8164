use tabled::Table;

use crate::{info, service::TitledService, types::UserTableRow, warning};

pub async fn users(service: &TitledService) {
    match service.users().list().await {
        Ok(users) if users.is_empty() => {
            info!("No users yet. Sign in through the web front end first (titled serve).")
        }
        Ok(users) => {
            let rows: Vec<UserTableRow> = users
                .into_iter()
                .map(|u| UserTableRow {
                    id: u.id,
                    display_name: u.display_name,
                })
                .collect();
            println!("{}", Table::new(rows));
        }
        Err(e) => warning!("Failed to load users. Err: {}", e),
    }
}
