/*
 * Responsibility
 * - 外部 API 呼び出しとドメイン判定 (handler からはここを使う)
 */
pub mod discord;
pub mod role_check;
