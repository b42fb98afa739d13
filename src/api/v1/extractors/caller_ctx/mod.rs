/*!
 * Caller context extractor
 *
 * Responsibility:
 * - access middleware が書いた識別ヘッダを handler 向けの型 (CallerCtx) にする
 * - 型定義は types、axum 依存は core に分離する
 *
 * Public API:
 * - CallerCtx
 * - RequireCaller
 */

mod core;
mod types;

pub use self::core::RequireCaller;
pub use types::CallerCtx;
