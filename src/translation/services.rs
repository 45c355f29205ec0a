//! Workflows that tie translation records to the database and the provider.

use crate::db::Database;
use crate::i18n::TranslationMetrics;
use crate::translation::entity::{EntityType, TranslationChange};
use crate::translation::translator::MachineTranslator;
use anyhow::Result;
use std::collections::BTreeMap;
use tracing::{debug, error, info};

/// Translate `source_text`, serving a stored machine translation when one
/// exists and storing fresh ones.
///
/// Provider failures are logged and reported as `Ok(None)`; only database
/// failures surface as errors. Identical source and target languages return
/// the text unchanged without touching the provider.
pub async fn get_and_cache_machine_translation<T: MachineTranslator>(
    db: &Database,
    translator: &T,
    metrics: &TranslationMetrics,
    source_language_code: &str,
    target_language_code: &str,
    source_text: &str,
) -> Result<Option<String>> {
    let source_text = source_text.trim();
    if source_language_code == target_language_code {
        return Ok(Some(source_text.to_string()));
    }

    if let Some(stored) =
        db.get_machine_translation(source_language_code, target_language_code, source_text)?
    {
        metrics.record_cache_hit();
        debug!(
            "Machine translation {} -> {} served from storage",
            source_language_code, target_language_code
        );
        return Ok(Some(stored.translated_text));
    }
    metrics.record_cache_miss();

    metrics.record_api_call();
    let translated = match translator
        .translate_text(source_text, source_language_code, target_language_code)
        .await
    {
        Ok(translated) => translated,
        Err(e) => {
            metrics.record_api_failure();
            error!(
                "Machine translation {} -> {} failed: {}",
                source_language_code, target_language_code, e
            );
            return Ok(None);
        }
    };

    db.create_machine_translation(
        source_language_code,
        target_language_code,
        source_text,
        &translated,
    )?;
    Ok(Some(translated))
}

/// Carry every language's translations of an entity forward to the entity's
/// next version, applying `changes` on the way.
///
/// Records of `old_version` are left as they are. Returns, per language code,
/// the number of translations in the new version that are still up to date.
pub fn update_translation_related_change(
    db: &Database,
    entity_type: EntityType,
    entity_id: &str,
    old_version: u32,
    changes: &[TranslationChange],
) -> Result<BTreeMap<String, usize>> {
    let current = db.get_all_entity_translations_for_entity(entity_type, entity_id, old_version)?;
    let next = current
        .iter()
        .map(|record| record.next_version(changes))
        .collect::<Result<Vec<_>, _>>()?;
    db.put_multi_entity_translations(&next)?;

    let counts: BTreeMap<String, usize> = next
        .iter()
        .map(|record| (record.language_code.clone(), record.up_to_date_count()))
        .collect();
    info!(
        "Moved translations of {} {} to version {} for {} language(s)",
        entity_type,
        entity_id,
        old_version.saturating_add(1),
        counts.len()
    );
    Ok(counts)
}
