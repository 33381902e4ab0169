use std::collections::BTreeMap;

use fixtura_core::{CapabilityHandler, Error, Result, StandIn, TypeKey, Value};

use crate::config::Configuration;
use crate::engine::Generator;

type CapabilityFn = Box<dyn Fn() -> Result<Value> + Send + Sync>;

/// Builds stand-ins for abstract types that have no concrete mapping.
///
/// Every capability is bound, at creation time, to a callback that asks a
/// nested generator for the capability's return type. The nested generator
/// shares the configuration but always caches and always creates stand-ins.
#[derive(Debug, Clone)]
pub struct StandInFactory {
    generator: Generator,
}

impl StandInFactory {
    pub fn new(config: &Configuration) -> Self {
        let mut nested = config.clone();
        nested.set_cache_enabled(true);
        nested.set_proxy_unmapped_interfaces(true);
        Self {
            generator: Generator::with_configuration(nested),
        }
    }

    /// Stand-in satisfying every given interface. A capability declared by
    /// more than one interface is bound once, by the last of them.
    pub fn create(&self, interfaces: &[TypeKey]) -> Result<StandIn> {
        let mut callbacks: BTreeMap<String, CapabilityFn> = BTreeMap::new();
        for interface in interfaces {
            let capabilities = self.generator.configuration().types().capabilities(interface)?;
            for capability in capabilities {
                let generator = self.generator.clone();
                let returns = capability.returns.clone();
                let name = capability.name.clone();
                let callback: CapabilityFn = Box::new(move || {
                    generator.get(&returns).map_err(|err| Error::Capability {
                        capability: name.clone(),
                        message: err.to_string(),
                    })
                });
                callbacks.insert(capability.name.clone(), callback);
            }
        }

        let handler = GeneratedCapabilities {
            interface: interfaces.first().cloned().unwrap_or_else(|| TypeKey::from("")),
            callbacks,
        };
        Ok(StandIn::new(interfaces.to_vec(), handler))
    }
}

struct GeneratedCapabilities {
    interface: TypeKey,
    callbacks: BTreeMap<String, CapabilityFn>,
}

impl CapabilityHandler for GeneratedCapabilities {
    fn capabilities(&self) -> Vec<String> {
        self.callbacks.keys().cloned().collect()
    }

    // Arguments are ignored.
    fn invoke(&self, capability: &str, _args: &[Value]) -> Result<Value> {
        let callback = self
            .callbacks
            .get(capability)
            .ok_or_else(|| Error::UnknownCapability {
                interface: self.interface.clone(),
                capability: capability.to_string(),
            })?;
        callback()
    }
}
