/*
 * Responsibility
 * - ドメインサービスの公開ポイント
 */
pub mod oauth;
