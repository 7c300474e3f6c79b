use crate::{
    AppState,
    auth::AuthUser,
    credentials,
    error::ApiError,
    models::{
        Board, BoardPayload, Card, CardPayload, CreatedResponse, List, ListPayload, LoginRequest,
        MessageResponse, RegisterRequest,
    },
    repository::{CardFilter, RepositoryState},
    seed, validation,
};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

// --- Filter Structs ---

/// CardFilterQuery
///
/// Accepted query flags for GET .../cartes. The flags are non-exclusive; an
/// absent flag and an explicit `false` are equivalent.
#[derive(Deserialize, Default, utoipa::IntoParams)]
pub struct CardFilterQuery {
    #[serde(rename = "cardsFilterNone")]
    pub none: Option<bool>,
    #[serde(rename = "cardsFilterTomorrow")]
    pub tomorrow: Option<bool>,
    #[serde(rename = "cardsFilterLate")]
    pub late: Option<bool>,
}

impl From<CardFilterQuery> for CardFilter {
    fn from(q: CardFilterQuery) -> Self {
        CardFilter {
            none: q.none.unwrap_or(false),
            tomorrow: q.tomorrow.unwrap_or(false),
            late: q.late.unwrap_or(false),
        }
    }
}

// --- Ownership Cascade ---
//
// Every nested operation authorizes by walking the resource tree outermost-first:
// Board (exists? 404 / owned? 403), then List (exists? 404 / in this board? 403),
// then Card (exists? 404 / in this list? 403). A missing ancestor is always
// reported before an ownership mismatch.
//
// The 404/403 wording is part of the wire contract and varies per operation:
// board-scoped endpoints say "Tableau inexistant." and name the caller as
// non-owner, while the nested list/card operations say "Tableau non trouvé."
// and spell out the refused action ("Vous n'êtes pas autorisé à ..."). Both
// messages therefore come from the call site.

/// Resolves a board and checks that the caller owns it.
async fn owned_board(
    repo: &RepositoryState,
    board_id: Uuid,
    user_id: Uuid,
    not_found: &str,
    forbidden: &str,
) -> Result<Board, ApiError> {
    let board = repo
        .get_board(board_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(not_found.to_string()))?;

    if board.owner_id != user_id {
        return Err(ApiError::Forbidden(forbidden.to_string()));
    }
    Ok(board)
}

/// Resolves a list and checks its back-reference against the path's board.
async fn list_in_board(
    repo: &RepositoryState,
    list_id: Uuid,
    board_id: Uuid,
    mismatch: &str,
) -> Result<List, ApiError> {
    let list = repo
        .get_list(list_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Liste non trouvée.".to_string()))?;

    if list.board_id != board_id {
        return Err(ApiError::Forbidden(mismatch.to_string()));
    }
    Ok(list)
}

/// Resolves a card and checks its back-reference against the path's list.
async fn card_in_list(
    repo: &RepositoryState,
    card_id: Uuid,
    list_id: Uuid,
) -> Result<Card, ApiError> {
    let card = repo
        .get_card(card_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Carte non trouvée.".to_string()))?;

    if card.list_id != list_id {
        return Err(ApiError::Forbidden(
            "Cette carte n'appartient pas à cette liste.".to_string(),
        ));
    }
    Ok(card)
}

/// Missing-fields pass: runs before any schema validation and reports every
/// missing field at once, unlike the schemas which stop at the first violation.
fn require_fields(fields: &[(&str, Option<&str>)]) -> Result<(), ApiError> {
    match validation::missing_fields(fields) {
        Some(message) => Err(ApiError::Validation(message)),
        None => Ok(()),
    }
}

// --- Auth Handlers ---

/// login
///
/// [Public Route] POST /connexion. On success the signed token travels in the
/// `Authorization` response header (exposed through CORS), not the body.
///
/// *Security*: an unknown email and a wrong password produce the same generic
/// message, so the response does not reveal whether the email exists.
#[utoipa::path(
    post,
    path = "/connexion",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Connected, token in Authorization header", body = MessageResponse),
        (status = 400, description = "Validation failure or bad credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_fields(&[
        ("courriel", payload.email.as_deref()),
        ("motDePasse", payload.password.as_deref()),
    ])?;
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();

    validation::validate_login(&email, &password).map_err(ApiError::Validation)?;

    let user = state
        .repo
        .find_user_by_email(&email)
        .await?
        .ok_or_else(|| ApiError::Validation("Courriel et/ou mot de passe invalide.".to_string()))?;

    let matches = credentials::verify_password(&password, &user.password_hash)?;
    if !matches {
        return Err(ApiError::Validation(
            "Courriel et/ou mot de passe invalide.".to_string(),
        ));
    }

    let token = credentials::sign_token(user.id, &state.config.jwt_secret)?;

    Ok((
        StatusCode::OK,
        [(header::AUTHORIZATION, format!("Bearer {token}"))],
        Json(MessageResponse {
            message: "Utilisateur connecté.".to_string(),
        }),
    ))
}

/// register
///
/// [Public Route] POST /inscription. Uniqueness of both the email and the name
/// is checked explicitly (email first) so each duplicate gets its own message.
#[utoipa::path(
    post,
    path = "/inscription",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Validation failure or duplicate name/email")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    require_fields(&[
        ("nom", payload.name.as_deref()),
        ("courriel", payload.email.as_deref()),
        ("motDePasse", payload.password.as_deref()),
        (
            "motDePasseConfirmation",
            payload.password_confirmation.as_deref(),
        ),
    ])?;
    let name = payload.name.unwrap_or_default();
    let email = payload.email.unwrap_or_default();
    let password = payload.password.unwrap_or_default();
    let confirmation = payload.password_confirmation.unwrap_or_default();

    validation::validate_registration(&name, &email, &password, &confirmation)
        .map_err(ApiError::Validation)?;

    if state.repo.find_user_by_email(&email).await?.is_some() {
        return Err(ApiError::Validation(
            "Un utilisateur avec ce courriel existe déjà.".to_string(),
        ));
    }
    if state.repo.find_user_by_name(&name).await?.is_some() {
        return Err(ApiError::Validation(
            "Un utilisateur avec ce nom existe déjà.".to_string(),
        ));
    }

    let hash = credentials::hash_password(&password)?;
    state.repo.create_user(&name, &email, &hash).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "L'utilisateur a été créé avec succès.".to_string(),
        }),
    ))
}

// --- Board Handlers ---

/// create_board
///
/// [Authenticated Route] POST /tableaux.
#[utoipa::path(
    post,
    path = "/tableaux",
    request_body = BoardPayload,
    responses((status = 201, description = "Board created", body = CreatedResponse))
)]
pub async fn create_board(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<BoardPayload>,
) -> Result<impl IntoResponse, ApiError> {
    require_fields(&[("titre", payload.title.as_deref())])?;
    let title = payload.title.unwrap_or_default();
    validation::validate_board_title(&title).map_err(ApiError::Validation)?;

    let board = state.repo.create_board(&title, user_id).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Tableau créé.".to_string(),
            id: board.id,
        }),
    ))
}

/// get_boards
///
/// [Authenticated Route] GET /tableaux — only the caller's own boards.
#[utoipa::path(
    get,
    path = "/tableaux",
    responses((status = 200, description = "Boards owned by the caller", body = [Board]))
)]
pub async fn get_boards(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Board>>, ApiError> {
    let boards = state.repo.get_boards(user_id).await?;
    Ok(Json(boards))
}

/// get_board
///
/// [Authenticated Route] GET /tableaux/{tableauId}.
#[utoipa::path(
    get,
    path = "/tableaux/{tableauId}",
    params(("tableauId" = Uuid, Path, description = "Board ID")),
    responses(
        (status = 200, description = "Found", body = Board),
        (status = 403, description = "Not the owner"),
        (status = 404, description = "Unknown board")
    )
)]
pub async fn get_board(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<Board>, ApiError> {
    let board = owned_board(
        &state.repo,
        board_id,
        user_id,
        "Tableau inexistant.",
        "Vous n'êtes pas le propriétaire de ce tableau.",
    )
    .await?;
    Ok(Json(board))
}

/// update_board
///
/// [Authenticated Route] PUT /tableaux/{tableauId}. Responds 201 with the
/// updated board, matching the shipped contract.
#[utoipa::path(
    put,
    path = "/tableaux/{tableauId}",
    request_body = BoardPayload,
    responses((status = 201, description = "Updated", body = Board))
)]
pub async fn update_board(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Json(payload): Json<BoardPayload>,
) -> Result<impl IntoResponse, ApiError> {
    require_fields(&[("titre", payload.title.as_deref())])?;
    let title = payload.title.unwrap_or_default();
    validation::validate_board_title(&title).map_err(ApiError::Validation)?;

    owned_board(
        &state.repo,
        board_id,
        user_id,
        "Tableau inexistant.",
        "Vous n'êtes pas le propriétaire de ce tableau.",
    )
    .await?;
    let board = state.repo.rename_board(board_id, &title).await?;

    Ok((StatusCode::CREATED, Json(board)))
}

/// delete_board
///
/// [Authenticated Route] DELETE /tableaux/{tableauId}. Removes the board with
/// its lists and cards so the tree keeps no orphans.
#[utoipa::path(
    delete,
    path = "/tableaux/{tableauId}",
    responses((status = 200, description = "Deleted", body = CreatedResponse))
)]
pub async fn delete_board(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let board = owned_board(
        &state.repo,
        board_id,
        user_id,
        "Tableau inexistant.",
        "Vous n'êtes pas le propriétaire de ce tableau.",
    )
    .await?;
    state.repo.delete_board(board.id).await?;

    Ok(Json(CreatedResponse {
        message: "Tableau supprimé avec succès.".to_string(),
        id: board.id,
    }))
}

// --- List Handlers ---

/// create_list
///
/// [Authenticated Route] POST /tableaux/{tableauId}/listes. The new list id is
/// appended to the board's ordered `listes` sequence in the same transaction.
#[utoipa::path(
    post,
    path = "/tableaux/{tableauId}/listes",
    request_body = ListPayload,
    responses((status = 201, description = "List created", body = CreatedResponse))
)]
pub async fn create_list(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
    Json(payload): Json<ListPayload>,
) -> Result<impl IntoResponse, ApiError> {
    require_fields(&[("titre", payload.title.as_deref())])?;
    let title = payload.title.unwrap_or_default();
    validation::validate_list_title(&title).map_err(ApiError::Validation)?;

    owned_board(
        &state.repo,
        board_id,
        user_id,
        "Tableau non trouvé.",
        "Vous n'êtes pas autorisé à créer une liste dans ce tableau.",
    )
    .await?;
    let list = state.repo.create_list(board_id, &title).await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Liste créée.".to_string(),
            id: list.id,
        }),
    ))
}

/// get_lists
///
/// [Authenticated Route] GET /tableaux/{tableauId}/listes.
#[utoipa::path(
    get,
    path = "/tableaux/{tableauId}/listes",
    responses((status = 200, description = "Lists of the board", body = [List]))
)]
pub async fn get_lists(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Path(board_id): Path<Uuid>,
) -> Result<Json<Vec<List>>, ApiError> {
    owned_board(
        &state.repo,
        board_id,
        user_id,
        "Tableau non trouvé.",
        "Vous n'êtes pas autorisé à voir les listes de ce tableau.",
    )
    .await?;
    let lists = state.repo.get_lists(board_id).await?;
    Ok(Json(lists))
}

/// get_list
///
/// [Authenticated Route] GET /tableaux/{tableauId}/listes/{listeId}.
#[utoipa::path(
    get,
    path = "/tableaux/{tableauId}/listes/{listeId}",
    responses(
        (status = 200, description = "Found", body = List),
        (status = 403, description = "Not the owner, or list not in this board"),
        (status = 404, description = "Unknown board or list")
    )
)]
pub async fn get_list(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<List>, ApiError> {
    owned_board(
        &state.repo,
        board_id,
        user_id,
        "Tableau non trouvé.",
        "Vous n'êtes pas autorisé à voir cette liste.",
    )
    .await?;
    let list = list_in_board(
        &state.repo,
        list_id,
        board_id,
        "Cette liste n'appartient pas au tableau.",
    )
    .await?;
    Ok(Json(list))
}

/// update_list
///
/// [Authenticated Route] PUT /tableaux/{tableauId}/listes/{listeId}. Responds
/// 201 with the updated list, matching the shipped contract.
#[utoipa::path(
    put,
    path = "/tableaux/{tableauId}/listes/{listeId}",
    request_body = ListPayload,
    responses((status = 201, description = "Updated", body = List))
)]
pub async fn update_list(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<ListPayload>,
) -> Result<impl IntoResponse, ApiError> {
    require_fields(&[("titre", payload.title.as_deref())])?;
    let title = payload.title.unwrap_or_default();
    validation::validate_list_title(&title).map_err(ApiError::Validation)?;

    owned_board(
        &state.repo,
        board_id,
        user_id,
        "Tableau non trouvé.",
        "Vous n'êtes pas autorisé à modifier cette liste.",
    )
    .await?;
    list_in_board(
        &state.repo,
        list_id,
        board_id,
        "Cette liste n'appartient pas au tableau.",
    )
    .await?;
    let list = state.repo.rename_list(list_id, &title).await?;

    Ok((StatusCode::CREATED, Json(list)))
}

/// delete_list
///
/// [Authenticated Route] DELETE /tableaux/{tableauId}/listes/{listeId}. The
/// list's cards are removed with it and its id is pulled from the board. The
/// confirmation body carries only the message, no id.
#[utoipa::path(
    delete,
    path = "/tableaux/{tableauId}/listes/{listeId}",
    responses((status = 200, description = "Deleted", body = MessageResponse))
)]
pub async fn delete_list(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    owned_board(
        &state.repo,
        board_id,
        user_id,
        "Tableau non trouvé.",
        "Vous n'êtes pas autorisé à supprimer cette liste.",
    )
    .await?;
    let list = list_in_board(
        &state.repo,
        list_id,
        board_id,
        "Cette liste n'appartient pas au tableau.",
    )
    .await?;
    state.repo.delete_list(list.id, board_id).await?;

    Ok(Json(MessageResponse {
        message: "Liste supprimée.".to_string(),
    }))
}

// --- Card Handlers ---

/// create_card
///
/// [Authenticated Route] POST .../listes/{listeId}/cartes. The description
/// defaults to empty and the due date is optional.
#[utoipa::path(
    post,
    path = "/tableaux/{tableauId}/listes/{listeId}/cartes",
    request_body = CardPayload,
    responses((status = 201, description = "Card created", body = CreatedResponse))
)]
pub async fn create_card(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<CardPayload>,
) -> Result<impl IntoResponse, ApiError> {
    require_fields(&[("titre", payload.title.as_deref())])?;
    let title = payload.title.unwrap_or_default();
    let description = payload.description.unwrap_or_default();

    validation::validate_card(&title, &description).map_err(ApiError::Validation)?;
    let due_date =
        validation::parse_due_date(payload.due_date.as_deref()).map_err(ApiError::Validation)?;

    owned_board(
        &state.repo,
        board_id,
        user_id,
        "Tableau non trouvé.",
        "Vous n'êtes pas autorisé à créer une carte dans ce tableau.",
    )
    .await?;
    list_in_board(
        &state.repo,
        list_id,
        board_id,
        "Vous n'êtes pas autorisé à créer une carte dans cette liste.",
    )
    .await?;

    let card = state
        .repo
        .create_card(list_id, &title, &description, due_date)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(CreatedResponse {
            message: "Carte créée avec succès.".to_string(),
            id: card.id,
        }),
    ))
}

/// get_cards
///
/// [Authenticated Route] GET .../cartes with the optional due-date filter flags.
/// No active flag means the full, unfiltered listing.
#[utoipa::path(
    get,
    path = "/tableaux/{tableauId}/listes/{listeId}/cartes",
    params(CardFilterQuery),
    responses((status = 200, description = "Cards of the list", body = [Card]))
)]
pub async fn get_cards(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Path((board_id, list_id)): Path<(Uuid, Uuid)>,
    Query(filter): Query<CardFilterQuery>,
) -> Result<Json<Vec<Card>>, ApiError> {
    owned_board(
        &state.repo,
        board_id,
        user_id,
        "Tableau non trouvé.",
        "Vous n'êtes pas autorisé à voir ces cartes.",
    )
    .await?;
    list_in_board(
        &state.repo,
        list_id,
        board_id,
        "Cette liste n'appartient pas au tableau.",
    )
    .await?;

    let cards = state.repo.get_cards(list_id, filter.into()).await?;
    Ok(Json(cards))
}

/// get_card
///
/// [Authenticated Route] GET .../cartes/{carteId}.
#[utoipa::path(
    get,
    path = "/tableaux/{tableauId}/listes/{listeId}/cartes/{carteId}",
    responses(
        (status = 200, description = "Found", body = Card),
        (status = 403, description = "Ownership or parent mismatch at any level"),
        (status = 404, description = "Unknown board, list or card")
    )
)]
pub async fn get_card(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Path((board_id, list_id, card_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<Json<Card>, ApiError> {
    owned_board(
        &state.repo,
        board_id,
        user_id,
        "Tableau non trouvé.",
        "Vous n'êtes pas autorisé à voir cette carte.",
    )
    .await?;
    list_in_board(
        &state.repo,
        list_id,
        board_id,
        "Cette liste n'appartient pas au tableau.",
    )
    .await?;
    let card = card_in_list(&state.repo, card_id, list_id).await?;
    Ok(Json(card))
}

/// update_card
///
/// [Authenticated Route] PUT .../cartes/{carteId}. Responds 201 with the
/// updated card, matching the shipped contract.
#[utoipa::path(
    put,
    path = "/tableaux/{tableauId}/listes/{listeId}/cartes/{carteId}",
    request_body = CardPayload,
    responses((status = 201, description = "Updated", body = Card))
)]
pub async fn update_card(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Path((board_id, list_id, card_id)): Path<(Uuid, Uuid, Uuid)>,
    Json(payload): Json<CardPayload>,
) -> Result<impl IntoResponse, ApiError> {
    require_fields(&[("titre", payload.title.as_deref())])?;
    let title = payload.title.unwrap_or_default();
    let description = payload.description.unwrap_or_default();

    validation::validate_card(&title, &description).map_err(ApiError::Validation)?;
    let due_date =
        validation::parse_due_date(payload.due_date.as_deref()).map_err(ApiError::Validation)?;

    owned_board(
        &state.repo,
        board_id,
        user_id,
        "Tableau non trouvé.",
        "Vous n'êtes pas autorisé à modifier cette carte.",
    )
    .await?;
    list_in_board(
        &state.repo,
        list_id,
        board_id,
        "Cette liste n'appartient pas au tableau.",
    )
    .await?;
    card_in_list(&state.repo, card_id, list_id).await?;

    let card = state
        .repo
        .update_card(card_id, &title, &description, due_date)
        .await?;

    Ok((StatusCode::CREATED, Json(card)))
}

/// delete_card
///
/// [Authenticated Route] DELETE .../cartes/{carteId}. Also pulls the card id
/// from the list's `cartes` sequence.
#[utoipa::path(
    delete,
    path = "/tableaux/{tableauId}/listes/{listeId}/cartes/{carteId}",
    responses((status = 200, description = "Deleted", body = CreatedResponse))
)]
pub async fn delete_card(
    AuthUser { id: user_id }: AuthUser,
    State(state): State<AppState>,
    Path((board_id, list_id, card_id)): Path<(Uuid, Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    owned_board(
        &state.repo,
        board_id,
        user_id,
        "Tableau non trouvé.",
        "Vous n'êtes pas autorisé à supprimer cette carte.",
    )
    .await?;
    list_in_board(
        &state.repo,
        list_id,
        board_id,
        "Cette liste n'appartient pas au tableau.",
    )
    .await?;
    let card = card_in_list(&state.repo, card_id, list_id).await?;
    state.repo.delete_card(card.id, list_id).await?;

    Ok(Json(CreatedResponse {
        message: "Carte supprimée avec succès.".to_string(),
        id: card.id,
    }))
}

// --- Maintenance Handlers ---

/// db_seed
///
/// [Maintenance Route, unauthenticated] GET /db/seed. Builds the deterministic
/// two-user fixture tree. Not part of the authorization-bearing core.
#[utoipa::path(
    get,
    path = "/db/seed",
    responses((status = 200, description = "Fixture data created"))
)]
pub async fn db_seed(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    seed::run(&state.repo).await?;
    Ok(StatusCode::OK)
}

/// db_drop
///
/// [Maintenance Route, unauthenticated] GET /db/drop. Deletes every document of
/// every entity type.
#[utoipa::path(
    get,
    path = "/db/drop",
    responses((status = 200, description = "All data removed"))
)]
pub async fn db_drop(State(state): State<AppState>) -> Result<StatusCode, ApiError> {
    state.repo.drop_all().await?;
    Ok(StatusCode::OK)
}
