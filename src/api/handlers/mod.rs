/*
 * Responsibility
 * - handler module の集約 (health / index / role_check)
 */
pub mod health;
pub mod index;
pub mod role_check;
