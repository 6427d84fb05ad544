//! Per-provider enrichment with inventories, traits, aggregates and usages.

use serde_json::Value;
use tracing::debug;

use crate::client::{
    PlacementClient, UsageList, aggregates_path, fetch, fetch_object, inventories_path,
    traits_path, usages_path,
};
use crate::graph::Attrs;
use crate::{Error, Result};

/// Complete a provider record with the data the listing call leaves out.
///
/// Issues four requests keyed by the record's `uuid`: inventories, traits,
/// aggregates and usages. The first three responses are merged into the
/// record as-is; the usage of each resource class is then written into the
/// matching inventory as `used`. Any failed request aborts enrichment.
pub fn enrich_provider<C>(client: &C, mut record: Attrs) -> Result<Attrs>
where
    C: PlacementClient + ?Sized,
{
    let uuid = record
        .get("uuid")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            Error::invalid_format("resource provider record has no string 'uuid'")
                .with_operation("enrich::enrich_provider")
        })?;
    debug!(uuid = %uuid, "enriching resource provider");

    record.extend(fetch_object(client, &inventories_path(&uuid), "inventories")?);
    record.extend(fetch_object(client, &traits_path(&uuid), "traits")?);
    record.extend(fetch_object(client, &aggregates_path(&uuid), "aggregates")?);
    let usages: UsageList = fetch(client, &usages_path(&uuid))?;

    merge_usages(&uuid, &mut record, &usages.usages)?;
    Ok(record)
}

/// Copy `usages[class]` into `inventories[class].used`, 0 when absent.
fn merge_usages(uuid: &str, record: &mut Attrs, usages: &Attrs) -> Result<()> {
    let Some(Value::Object(inventories)) = record.get_mut("inventories") else {
        return Err(Error::invalid_format(format!(
            "inventories of resource provider '{uuid}' is not a map"
        ))
        .with_context("uuid", uuid));
    };
    for (class, inventory) in inventories.iter_mut() {
        let Value::Object(inventory) = inventory else {
            return Err(Error::invalid_format(format!(
                "inventory '{class}' of resource provider '{uuid}' is not a map"
            ))
            .with_context("uuid", uuid));
        };
        let used = usages.get(class).cloned().unwrap_or(Value::from(0));
        inventory.insert("used".to_string(), used);
    }
    Ok(())
}
