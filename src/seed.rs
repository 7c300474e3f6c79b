use crate::{credentials, error::ApiError, repository::RepositoryState};
use chrono::{Duration, Utc};

// Deterministic fixture data for development and testing. Exposed through the
// unauthenticated /db/seed endpoint; not part of the authorization-bearing core.

const SEED_PASSWORD: &str = "123456";

const SEED_USERS: [(&str, &str); 2] = [
    ("Utilisateur 1", "123@hotmail.com"),
    ("Utilisateur 2", "123@gmail.com"),
];

/// run
///
/// Builds the fixture tree root-to-leaf through the same repository operations
/// the controllers use: two users, each with two boards, each board with two
/// lists, each list with four cards. Three cards carry due dates at fixed
/// offsets (+2 days, -1 day, +5 hours); the fourth has none.
pub async fn run(repo: &RepositoryState) -> Result<(), ApiError> {
    let hash = credentials::hash_password(SEED_PASSWORD)?;
    let now = Utc::now();

    let due_dates = [
        Some(now + Duration::days(2)),
        Some(now - Duration::days(1)),
        Some(now + Duration::hours(5)),
        None,
    ];

    for (name, email) in SEED_USERS {
        let user = repo.create_user(name, email, &hash).await?;

        for board_no in 1..=2 {
            let board = repo
                .create_board(&format!("Tableau {board_no}"), user.id)
                .await?;

            for list_no in 1..=2 {
                let list = repo
                    .create_list(board.id, &format!("Liste {list_no}"))
                    .await?;

                for (card_no, due_date) in due_dates.iter().enumerate() {
                    repo.create_card(
                        list.id,
                        &format!("Carte {}", card_no + 1),
                        &format!("Description de la carte {}", card_no + 1),
                        *due_date,
                    )
                    .await?;
                }
            }
        }
    }

    Ok(())
}
