/**
 * Responsibility
 *  - core (probe 型と chain) と sources (個々の extractor) を束ねる
 *  - handler に公開するのは extract_user_id のみ
 */
mod core;
mod sources;

pub use self::core::extract_user_id;
