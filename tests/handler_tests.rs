use async_trait::async_trait;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use taches_api::{
    AppState,
    auth::AuthUser,
    config::AppConfig,
    credentials, handlers,
    models::{Board, BoardPayload, Card, CardPayload, List, ListPayload, LoginRequest, User},
    repository::{CardFilter, DbResult, Repository},
};
use uuid::Uuid;

// --- MOCK REPOSITORY IMPLEMENTATION ---

// Central control point for testing handler logic: handlers depend on the
// Repository trait, so each test pre-cans the lookups it needs.
#[derive(Default)]
pub struct MockRepoControl {
    pub user: Option<User>,
    pub user_by_email: Option<User>,
    pub user_by_name: Option<User>,
    pub board: Option<Board>,
    pub list: Option<List>,
    pub card: Option<Card>,
    pub boards: Vec<Board>,
    pub lists: Vec<List>,
    pub cards: Vec<Card>,
}

#[async_trait]
impl Repository for MockRepoControl {
    async fn get_user(&self, _id: Uuid) -> DbResult<Option<User>> {
        Ok(self.user.clone())
    }
    async fn find_user_by_email(&self, _email: &str) -> DbResult<Option<User>> {
        Ok(self.user_by_email.clone())
    }
    async fn find_user_by_name(&self, _name: &str) -> DbResult<Option<User>> {
        Ok(self.user_by_name.clone())
    }
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> DbResult<User> {
        Ok(User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            ..User::default()
        })
    }

    async fn get_boards(&self, _owner_id: Uuid) -> DbResult<Vec<Board>> {
        Ok(self.boards.clone())
    }
    async fn get_board(&self, _id: Uuid) -> DbResult<Option<Board>> {
        Ok(self.board.clone())
    }
    async fn create_board(&self, title: &str, owner_id: Uuid) -> DbResult<Board> {
        Ok(Board {
            id: Uuid::new_v4(),
            title: title.to_string(),
            owner_id,
            ..Board::default()
        })
    }
    async fn rename_board(&self, _id: Uuid, title: &str) -> DbResult<Board> {
        self.board
            .clone()
            .map(|b| Board {
                title: title.to_string(),
                ..b
            })
            .ok_or(sqlx::Error::RowNotFound)
    }
    async fn delete_board(&self, _id: Uuid) -> DbResult<()> {
        Ok(())
    }

    async fn get_lists(&self, _board_id: Uuid) -> DbResult<Vec<List>> {
        Ok(self.lists.clone())
    }
    async fn get_list(&self, _id: Uuid) -> DbResult<Option<List>> {
        Ok(self.list.clone())
    }
    async fn create_list(&self, board_id: Uuid, title: &str) -> DbResult<List> {
        Ok(List {
            id: Uuid::new_v4(),
            title: title.to_string(),
            board_id,
            ..List::default()
        })
    }
    async fn rename_list(&self, _id: Uuid, title: &str) -> DbResult<List> {
        self.list
            .clone()
            .map(|l| List {
                title: title.to_string(),
                ..l
            })
            .ok_or(sqlx::Error::RowNotFound)
    }
    async fn delete_list(&self, _id: Uuid, _board_id: Uuid) -> DbResult<()> {
        Ok(())
    }

    async fn get_cards(&self, _list_id: Uuid, _filter: CardFilter) -> DbResult<Vec<Card>> {
        Ok(self.cards.clone())
    }
    async fn get_card(&self, _id: Uuid) -> DbResult<Option<Card>> {
        Ok(self.card.clone())
    }
    async fn create_card(
        &self,
        list_id: Uuid,
        title: &str,
        description: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> DbResult<Card> {
        Ok(Card {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            list_id,
            due_date,
            ..Card::default()
        })
    }
    async fn update_card(
        &self,
        _id: Uuid,
        title: &str,
        description: &str,
        due_date: Option<DateTime<Utc>>,
    ) -> DbResult<Card> {
        self.card
            .clone()
            .map(|c| Card {
                title: title.to_string(),
                description: description.to_string(),
                due_date,
                ..c
            })
            .ok_or(sqlx::Error::RowNotFound)
    }
    async fn delete_card(&self, _id: Uuid, _list_id: Uuid) -> DbResult<()> {
        Ok(())
    }

    async fn drop_all(&self) -> DbResult<()> {
        Ok(())
    }
}

// --- TEST UTILITIES ---

const CALLER_ID: Uuid = Uuid::from_u128(123);
const OTHER_USER_ID: Uuid = Uuid::from_u128(456);
const BOARD_ID: Uuid = Uuid::from_u128(1001);
const LIST_ID: Uuid = Uuid::from_u128(1002);
const CARD_ID: Uuid = Uuid::from_u128(1003);

fn create_test_state(repo_control: MockRepoControl) -> AppState {
    AppState {
        repo: Arc::new(repo_control),
        config: AppConfig::default(),
    }
}

fn caller() -> AuthUser {
    AuthUser { id: CALLER_ID }
}

fn owned_board() -> Board {
    Board {
        id: BOARD_ID,
        title: "Tableau".to_string(),
        owner_id: CALLER_ID,
        ..Board::default()
    }
}

fn list_of(board_id: Uuid) -> List {
    List {
        id: LIST_ID,
        title: "Liste".to_string(),
        board_id,
        ..List::default()
    }
}

fn card_of(list_id: Uuid) -> Card {
    Card {
        id: CARD_ID,
        title: "Carte".to_string(),
        list_id,
        ..Card::default()
    }
}

// --- OWNERSHIP CASCADE ---

#[tokio::test]
async fn unknown_board_is_404_before_any_ownership_check() {
    // The board does not exist at all: 404, never 403. Board-scoped endpoints
    // use their own wording, distinct from the nested operations.
    let state = create_test_state(MockRepoControl::default());

    let result = handlers::get_board(caller(), State(state), Path(BOARD_ID)).await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(err.to_string(), "Tableau inexistant.");
}

#[tokio::test]
async fn nested_operations_use_their_own_unknown_board_wording() {
    let state = create_test_state(MockRepoControl::default());

    let result = handlers::get_list(caller(), State(state), Path((BOARD_ID, LIST_ID))).await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), StatusCode::NOT_FOUND);
    assert_eq!(err.to_string(), "Tableau non trouvé.");
}

#[tokio::test]
async fn foreign_board_is_403_with_a_valid_token() {
    let state = create_test_state(MockRepoControl {
        board: Some(Board {
            owner_id: OTHER_USER_ID,
            ..owned_board()
        }),
        ..MockRepoControl::default()
    });

    let result = handlers::get_board(caller(), State(state), Path(BOARD_ID)).await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
    assert_eq!(err.to_string(), "Vous n'êtes pas le propriétaire de ce tableau.");
}

#[tokio::test]
async fn each_nested_operation_refuses_with_its_own_wording() {
    // The 403 for a foreign board spells out the refused action per operation.
    let foreign = MockRepoControl {
        board: Some(Board {
            owner_id: OTHER_USER_ID,
            ..owned_board()
        }),
        ..MockRepoControl::default()
    };
    let state = create_test_state(foreign);

    let err = handlers::get_cards(
        caller(),
        State(state.clone()),
        Path((BOARD_ID, LIST_ID)),
        Query(handlers::CardFilterQuery::default()),
    )
    .await
    .unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
    assert_eq!(err.to_string(), "Vous n'êtes pas autorisé à voir ces cartes.");

    let err = handlers::delete_list(caller(), State(state.clone()), Path((BOARD_ID, LIST_ID)))
        .await
        .err()
        .unwrap();
    assert_eq!(err.to_string(), "Vous n'êtes pas autorisé à supprimer cette liste.");

    let err = handlers::create_list(
        caller(),
        State(state),
        Path(BOARD_ID),
        Json(ListPayload {
            title: Some("Liste".to_string()),
        }),
    )
    .await
    .err()
    .unwrap();
    assert_eq!(
        err.to_string(),
        "Vous n'êtes pas autorisé à créer une liste dans ce tableau."
    );
}

#[tokio::test]
async fn card_creation_in_a_mismatched_list_has_its_own_message() {
    // Unlike the other card operations, the create path words the list/board
    // mismatch as a refused creation.
    let state = create_test_state(MockRepoControl {
        board: Some(owned_board()),
        list: Some(list_of(Uuid::from_u128(9999))),
        ..MockRepoControl::default()
    });

    let err = handlers::create_card(
        caller(),
        State(state),
        Path((BOARD_ID, LIST_ID)),
        Json(CardPayload {
            title: Some("Carte".to_string()),
            description: None,
            due_date: None,
        }),
    )
    .await
    .err()
    .unwrap();

    assert_eq!(err.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        err.to_string(),
        "Vous n'êtes pas autorisé à créer une carte dans cette liste."
    );
}

#[tokio::test]
async fn list_from_another_board_is_403_even_for_the_owner() {
    // The caller owns the path board, but the list's stored boardId points
    // elsewhere (possibly another board the caller also owns).
    let state = create_test_state(MockRepoControl {
        board: Some(owned_board()),
        list: Some(list_of(Uuid::from_u128(9999))),
        ..MockRepoControl::default()
    });

    let result = handlers::get_list(caller(), State(state), Path((BOARD_ID, LIST_ID))).await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
    assert_eq!(err.to_string(), "Cette liste n'appartient pas au tableau.");
}

#[tokio::test]
async fn unknown_list_is_404() {
    let state = create_test_state(MockRepoControl {
        board: Some(owned_board()),
        ..MockRepoControl::default()
    });

    let result = handlers::get_list(caller(), State(state), Path((BOARD_ID, LIST_ID))).await;

    assert_eq!(result.unwrap_err().status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn card_from_another_list_is_403() {
    let state = create_test_state(MockRepoControl {
        board: Some(owned_board()),
        list: Some(list_of(BOARD_ID)),
        card: Some(card_of(Uuid::from_u128(9999))),
        ..MockRepoControl::default()
    });

    let result =
        handlers::get_card(caller(), State(state), Path((BOARD_ID, LIST_ID, CARD_ID))).await;

    let err = result.unwrap_err();
    assert_eq!(err.status(), StatusCode::FORBIDDEN);
    assert_eq!(err.to_string(), "Cette carte n'appartient pas à cette liste.");
}

#[tokio::test]
async fn owned_card_resolves_through_the_full_cascade() {
    let state = create_test_state(MockRepoControl {
        board: Some(owned_board()),
        list: Some(list_of(BOARD_ID)),
        card: Some(card_of(LIST_ID)),
        ..MockRepoControl::default()
    });

    let result =
        handlers::get_card(caller(), State(state), Path((BOARD_ID, LIST_ID, CARD_ID))).await;

    let Json(card) = result.unwrap();
    assert_eq!(card.id, CARD_ID);
}

// --- VALIDATION BEHAVIOR ---

#[tokio::test]
async fn create_board_without_title_is_400_naming_the_field() {
    let state = create_test_state(MockRepoControl::default());

    let result = handlers::create_board(
        caller(),
        State(state),
        Json(BoardPayload { title: None }),
    )
    .await;

    let err = result.err().unwrap();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert!(err.to_string().contains("titre"));
}

#[tokio::test]
async fn create_card_rejects_unparseable_due_date() {
    let state = create_test_state(MockRepoControl {
        board: Some(owned_board()),
        list: Some(list_of(BOARD_ID)),
        ..MockRepoControl::default()
    });

    let result = handlers::create_card(
        caller(),
        State(state),
        Path((BOARD_ID, LIST_ID)),
        Json(CardPayload {
            title: Some("Carte".to_string()),
            description: None,
            due_date: Some("demain".to_string()),
        }),
    )
    .await;

    let err = result.err().unwrap();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "La dateLimite doit être valide.");
}

// --- STATUS CODE CONTRACT ---

#[tokio::test]
async fn update_board_responds_201() {
    let state = create_test_state(MockRepoControl {
        board: Some(owned_board()),
        ..MockRepoControl::default()
    });

    let result = handlers::update_board(
        caller(),
        State(state),
        Path(BOARD_ID),
        Json(BoardPayload {
            title: Some("Nouveau titre".to_string()),
        }),
    )
    .await;

    let response = result.unwrap().into_response();
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn update_list_responds_201() {
    let state = create_test_state(MockRepoControl {
        board: Some(owned_board()),
        list: Some(list_of(BOARD_ID)),
        ..MockRepoControl::default()
    });

    let result = handlers::update_list(
        caller(),
        State(state),
        Path((BOARD_ID, LIST_ID)),
        Json(ListPayload {
            title: Some("Nouvelle liste".to_string()),
        }),
    )
    .await;

    assert_eq!(result.unwrap().into_response().status(), StatusCode::CREATED);
}

#[tokio::test]
async fn delete_list_confirms_without_an_id() {
    // The list deletion body is `{message}` only, unlike the card deletion
    // which also reports the removed id.
    let state = create_test_state(MockRepoControl {
        board: Some(owned_board()),
        list: Some(list_of(BOARD_ID)),
        ..MockRepoControl::default()
    });

    let result = handlers::delete_list(caller(), State(state), Path((BOARD_ID, LIST_ID))).await;

    let response = result.unwrap().into_response();
    assert_eq!(response.status(), StatusCode::OK);
    let (_parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["message"], "Liste supprimée.");
    assert!(value.get("id").is_none());
}

#[tokio::test]
async fn delete_card_responds_200_with_confirmation() {
    let state = create_test_state(MockRepoControl {
        board: Some(owned_board()),
        list: Some(list_of(BOARD_ID)),
        card: Some(card_of(LIST_ID)),
        ..MockRepoControl::default()
    });

    let result =
        handlers::delete_card(caller(), State(state), Path((BOARD_ID, LIST_ID, CARD_ID))).await;

    let response = result.unwrap().into_response();
    assert_eq!(response.status(), StatusCode::OK);
}

// --- LOGIN BEHAVIOR ---

#[tokio::test]
async fn login_with_wrong_password_is_a_generic_400() {
    let hash = credentials::hash_password("bonmotdepasse").unwrap();
    let state = create_test_state(MockRepoControl {
        user_by_email: Some(User {
            id: CALLER_ID,
            name: "Jean".to_string(),
            email: "jean@exemple.com".to_string(),
            password_hash: hash,
            ..User::default()
        }),
        ..MockRepoControl::default()
    });

    let result = handlers::login(
        State(state),
        Json(LoginRequest {
            email: Some("jean@exemple.com".to_string()),
            password: Some("mauvais-mdp".to_string()),
        }),
    )
    .await;

    let err = result.err().unwrap();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "Courriel et/ou mot de passe invalide.");
}

#[tokio::test]
async fn login_with_unknown_email_uses_the_same_message() {
    // Must not reveal whether the email exists.
    let state = create_test_state(MockRepoControl::default());

    let result = handlers::login(
        State(state),
        Json(LoginRequest {
            email: Some("inconnu@exemple.com".to_string()),
            password: Some("motdepasse".to_string()),
        }),
    )
    .await;

    let err = result.err().unwrap();
    assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    assert_eq!(err.to_string(), "Courriel et/ou mot de passe invalide.");
}

// --- SERIALIZATION CONTRACT ---

#[tokio::test]
async fn card_without_due_date_serializes_as_json_null() {
    let state = create_test_state(MockRepoControl {
        board: Some(owned_board()),
        list: Some(list_of(BOARD_ID)),
        card: Some(Card {
            due_date: None,
            ..card_of(LIST_ID)
        }),
        ..MockRepoControl::default()
    });

    let result =
        handlers::get_card(caller(), State(state), Path((BOARD_ID, LIST_ID, CARD_ID))).await;

    let response = result.unwrap().into_response();
    let (_parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert!(value.get("dateLimite").unwrap().is_null());
    assert_eq!(value.get("titre").unwrap(), "Carte");
}

// --- CARD LISTING ---

#[tokio::test]
async fn get_cards_passes_through_the_listing() {
    let state = create_test_state(MockRepoControl {
        board: Some(owned_board()),
        list: Some(list_of(BOARD_ID)),
        cards: vec![card_of(LIST_ID), card_of(LIST_ID)],
        ..MockRepoControl::default()
    });

    let result = handlers::get_cards(
        caller(),
        State(state),
        Path((BOARD_ID, LIST_ID)),
        Query(handlers::CardFilterQuery::default()),
    )
    .await;

    let Json(cards) = result.unwrap();
    assert_eq!(cards.len(), 2);
}
