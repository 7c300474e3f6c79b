use crate::models::{Board, Card, List, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// DbResult
///
/// Every repository method returns its raw `sqlx::Error` on failure. There is no
/// retry or local recovery anywhere: database failures propagate directly to the
/// terminal error stage, which logs them and answers 500.
pub type DbResult<T> = Result<T, sqlx::Error>;

/// CardFilter
///
/// The three mutually-non-exclusive card listing filters. When no flag is active
/// the listing is unfiltered; otherwise the result is the union of each active
/// filter's set. The union is computed as a single OR'd predicate, so a card
/// matching several filters appears exactly once.
#[derive(Debug, Clone, Copy, Default)]
pub struct CardFilter {
    /// Cards with no due date.
    pub none: bool,
    /// Cards due within [now, now + 1 day).
    pub tomorrow: bool,
    /// Cards whose due date is strictly in the past.
    pub late: bool,
}

impl CardFilter {
    pub fn is_active(&self) -> bool {
        self.none || self.tomorrow || self.late
    }
}

/// Repository Trait
///
/// Defines the abstract contract for all persistence operations. This is the core
/// of the Repository Abstraction pattern, allowing the handlers to interact with
/// the data layer without knowing the specific implementation (Postgres, Mock, etc.).
///
/// **Send + Sync + async_trait** are required to make the trait object
/// (`Arc<dyn Repository>`) safely shareable across Axum's asynchronous task boundaries.
#[async_trait]
pub trait Repository: Send + Sync {
    // --- Users ---
    async fn get_user(&self, id: Uuid) -> DbResult<Option<User>>;
    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>>;
    async fn find_user_by_name(&self, name: &str) -> DbResult<Option<User>>;
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> DbResult<User>;

    // --- Boards ---
    async fn get_boards(&self, owner_id: Uuid) -> DbResult<Vec<Board>>;
    async fn get_board(&self, id: Uuid) -> DbResult<Option<Board>>;
    async fn create_board(&self, title: &str, owner_id: Uuid) -> DbResult<Board>;
    async fn rename_board(&self, id: Uuid, title: &str) -> DbResult<Board>;
    /// Deletes the board together with its lists and their cards, atomically.
    async fn delete_board(&self, id: Uuid) -> DbResult<()>;

    // --- Lists ---
    async fn get_lists(&self, board_id: Uuid) -> DbResult<Vec<List>>;
    async fn get_list(&self, id: Uuid) -> DbResult<Option<List>>;
    /// Inserts the list and appends its id to the parent board's ordered
    /// `list_ids`, in one transaction.
    async fn create_list(&self, board_id: Uuid, title: &str) -> DbResult<List>;
    async fn rename_list(&self, id: Uuid, title: &str) -> DbResult<List>;
    /// Deletes the list and its cards, and removes its id from the parent board.
    async fn delete_list(&self, id: Uuid, board_id: Uuid) -> DbResult<()>;

    // --- Cards ---
    async fn get_cards(&self, list_id: Uuid, filter: CardFilter) -> DbResult<Vec<Card>>;
    async fn get_card(&self, id: Uuid) -> DbResult<Option<Card>>;
    /// Inserts the card and appends its id to the parent list's ordered
    /// `card_ids`, in one transaction.
    async fn create_card(
        &self,
        list_id: Uuid,
        title: &str,
        description: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> DbResult<Card>;
    async fn update_card(
        &self,
        id: Uuid,
        title: &str,
        description: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> DbResult<Card>;
    /// Deletes the card and removes its id from the parent list.
    async fn delete_card(&self, id: Uuid, list_id: Uuid) -> DbResult<()>;

    // --- Maintenance ---
    /// Unconditionally removes every document of every entity type.
    async fn drop_all(&self) -> DbResult<()>;
}

/// RepositoryState
///
/// The concrete type used to share the persistence layer access across the
/// application state.
pub type RepositoryState = Arc<dyn Repository>;

/// PostgresRepository
///
/// The concrete implementation of the `Repository` trait, backed by PostgreSQL.
/// The original system stored these entities as documents; here each entity is a
/// row, and the denormalized parent/child id sequences (`boards.list_ids`,
/// `lists.card_ids`) are `uuid[]` columns kept in step with the child's
/// back-reference column inside a transaction.
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    /// Creates a new repository instance using the initialized connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const USER_COLS: &str = "id, name, email, password_hash, created_at, updated_at";
const BOARD_COLS: &str = "id, title, owner_id, list_ids, created_at, updated_at";
const LIST_COLS: &str = "id, title, board_id, card_ids, created_at, updated_at";
const CARD_COLS: &str = "id, title, description, list_id, due_date, created_at, updated_at";

#[async_trait]
impl Repository for PostgresRepository {
    async fn get_user(&self, id: Uuid) -> DbResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_user_by_email(&self, email: &str) -> DbResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_user_by_name(&self, name: &str) -> DbResult<Option<User>> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLS} FROM users WHERE name = $1"))
            .bind(name)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> DbResult<User> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, name, email, password_hash) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLS}"
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_boards(&self, owner_id: Uuid) -> DbResult<Vec<Board>> {
        sqlx::query_as::<_, Board>(&format!(
            "SELECT {BOARD_COLS} FROM boards WHERE owner_id = $1 ORDER BY created_at ASC"
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_board(&self, id: Uuid) -> DbResult<Option<Board>> {
        sqlx::query_as::<_, Board>(&format!("SELECT {BOARD_COLS} FROM boards WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_board(&self, title: &str, owner_id: Uuid) -> DbResult<Board> {
        sqlx::query_as::<_, Board>(&format!(
            "INSERT INTO boards (id, title, owner_id) \
             VALUES ($1, $2, $3) RETURNING {BOARD_COLS}"
        ))
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await
    }

    async fn rename_board(&self, id: Uuid, title: &str) -> DbResult<Board> {
        sqlx::query_as::<_, Board>(&format!(
            "UPDATE boards SET title = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {BOARD_COLS}"
        ))
        .bind(id)
        .bind(title)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_board(&self, id: Uuid) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "DELETE FROM cards WHERE list_id IN (SELECT id FROM lists WHERE board_id = $1)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM lists WHERE board_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM boards WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }

    async fn get_lists(&self, board_id: Uuid) -> DbResult<Vec<List>> {
        sqlx::query_as::<_, List>(&format!(
            "SELECT {LIST_COLS} FROM lists WHERE board_id = $1 ORDER BY created_at ASC"
        ))
        .bind(board_id)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_list(&self, id: Uuid) -> DbResult<Option<List>> {
        sqlx::query_as::<_, List>(&format!("SELECT {LIST_COLS} FROM lists WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_list(&self, board_id: Uuid, title: &str) -> DbResult<List> {
        let mut tx = self.pool.begin().await?;

        let list = sqlx::query_as::<_, List>(&format!(
            "INSERT INTO lists (id, title, board_id) \
             VALUES ($1, $2, $3) RETURNING {LIST_COLS}"
        ))
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(board_id)
        .fetch_one(&mut *tx)
        .await?;

        // Keep the parent's ordered id sequence in step with the back-reference.
        sqlx::query(
            "UPDATE boards SET list_ids = array_append(list_ids, $1), updated_at = NOW() \
             WHERE id = $2",
        )
        .bind(list.id)
        .bind(board_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(list)
    }

    async fn rename_list(&self, id: Uuid, title: &str) -> DbResult<List> {
        sqlx::query_as::<_, List>(&format!(
            "UPDATE lists SET title = $2, updated_at = NOW() \
             WHERE id = $1 RETURNING {LIST_COLS}"
        ))
        .bind(id)
        .bind(title)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_list(&self, id: Uuid, board_id: Uuid) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cards WHERE list_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "UPDATE boards SET list_ids = array_remove(list_ids, $1), updated_at = NOW() \
             WHERE id = $2",
        )
        .bind(id)
        .bind(board_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    async fn get_cards(&self, list_id: Uuid, filter: CardFilter) -> DbResult<Vec<Card>> {
        if !filter.is_active() {
            return sqlx::query_as::<_, Card>(&format!(
                "SELECT {CARD_COLS} FROM cards WHERE list_id = $1 ORDER BY created_at ASC"
            ))
            .bind(list_id)
            .fetch_all(&self.pool)
            .await;
        }

        // Union of the active filters as one OR'd predicate.
        sqlx::query_as::<_, Card>(&format!(
            "SELECT {CARD_COLS} FROM cards WHERE list_id = $1 AND ( \
                ($2 AND due_date IS NULL) OR \
                ($3 AND due_date >= NOW() AND due_date < NOW() + INTERVAL '1 day') OR \
                ($4 AND due_date < NOW()) \
             ) ORDER BY created_at ASC"
        ))
        .bind(list_id)
        .bind(filter.none)
        .bind(filter.tomorrow)
        .bind(filter.late)
        .fetch_all(&self.pool)
        .await
    }

    async fn get_card(&self, id: Uuid) -> DbResult<Option<Card>> {
        sqlx::query_as::<_, Card>(&format!("SELECT {CARD_COLS} FROM cards WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn create_card(
        &self,
        list_id: Uuid,
        title: &str,
        description: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> DbResult<Card> {
        let mut tx = self.pool.begin().await?;

        let card = sqlx::query_as::<_, Card>(&format!(
            "INSERT INTO cards (id, title, description, list_id, due_date) \
             VALUES ($1, $2, $3, $4, $5) RETURNING {CARD_COLS}"
        ))
        .bind(Uuid::new_v4())
        .bind(title)
        .bind(description)
        .bind(list_id)
        .bind(due_date)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            "UPDATE lists SET card_ids = array_append(card_ids, $1), updated_at = NOW() \
             WHERE id = $2",
        )
        .bind(card.id)
        .bind(list_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(card)
    }

    async fn update_card(
        &self,
        id: Uuid,
        title: &str,
        description: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> DbResult<Card> {
        sqlx::query_as::<_, Card>(&format!(
            "UPDATE cards SET title = $2, description = $3, due_date = $4, updated_at = NOW() \
             WHERE id = $1 RETURNING {CARD_COLS}"
        ))
        .bind(id)
        .bind(title)
        .bind(description)
        .bind(due_date)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_card(&self, id: Uuid, list_id: Uuid) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cards WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query(
            "UPDATE lists SET card_ids = array_remove(card_ids, $1), updated_at = NOW() \
             WHERE id = $2",
        )
        .bind(id)
        .bind(list_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await
    }

    async fn drop_all(&self) -> DbResult<()> {
        sqlx::query("TRUNCATE cards, lists, boards, users")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
