/*
 * Responsibility
 * - middleware の公開インターフェース
 * - cors / http (横断的関心) はグローバル、auth は保護ルートのみ
 */
pub mod auth;
pub mod cors;
pub mod http;
