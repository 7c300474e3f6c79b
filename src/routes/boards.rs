use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{delete, get, post, put},
};

/// Board Router Module
///
/// The /tableaux resource tree: boards, their lists, and the lists' cards.
///
/// Access Control Strategy:
/// Every handler here relies on the `AuthUser` extractor middleware applied on
/// the layer above this module (see `create_router`), which validates the JWT
/// and confirms the user still exists. On top of that, each handler walks the
/// ownership cascade outermost-first: board owner, list-in-board, card-in-list.
pub fn board_routes() -> Router<AppState> {
    Router::<AppState>::new()
        // POST/GET /tableaux
        .route(
            "/tableaux",
            post(handlers::create_board).get(handlers::get_boards),
        )
        // GET/PUT/DELETE /tableaux/{tableauId}
        .route(
            "/tableaux/{tableauId}",
            get(handlers::get_board)
                .put(handlers::update_board)
                .delete(handlers::delete_board),
        )
        // POST/GET /tableaux/{tableauId}/listes
        .route(
            "/tableaux/{tableauId}/listes",
            post(handlers::create_list).get(handlers::get_lists),
        )
        // GET/PUT/DELETE /tableaux/{tableauId}/listes/{listeId}
        .route(
            "/tableaux/{tableauId}/listes/{listeId}",
            get(handlers::get_list)
                .put(handlers::update_list)
                .delete(handlers::delete_list),
        )
        // POST/GET /tableaux/{tableauId}/listes/{listeId}/cartes
        // The GET accepts the cardsFilterNone/cardsFilterTomorrow/cardsFilterLate
        // query flags.
        .route(
            "/tableaux/{tableauId}/listes/{listeId}/cartes",
            post(handlers::create_card).get(handlers::get_cards),
        )
        // GET/PUT/DELETE /tableaux/{tableauId}/listes/{listeId}/cartes/{carteId}
        .route(
            "/tableaux/{tableauId}/listes/{listeId}/cartes/{carteId}",
            get(handlers::get_card)
                .put(handlers::update_card)
                .delete(handlers::delete_card),
        )
}
