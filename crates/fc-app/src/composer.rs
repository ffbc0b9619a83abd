//! Packing of module states into one combined state vector.

use fc_physics::PhysicsModule;
use nalgebra::DVector;

use crate::error::{AppError, AppResult};

/// Position of one module's state inside the combined vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSlot {
    pub name: String,
    pub offset: usize,
    pub len: usize,
}

impl ModuleSlot {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.offset..self.offset + self.len
    }
}

/// Fixed slot layout over an ordered module set.
///
/// The layout is taken once from the modules it is built from. Every later
/// `pack`/`unpack` must be given modules with the same names and lengths, in
/// the same order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateComposer {
    slots: Vec<ModuleSlot>,
    total_len: usize,
}

impl StateComposer {
    pub fn from_modules(modules: &[&dyn PhysicsModule]) -> Self {
        let mut slots = Vec::with_capacity(modules.len());
        let mut offset = 0;
        for module in modules {
            let len = module.state_len();
            slots.push(ModuleSlot {
                name: module.name().to_string(),
                offset,
                len,
            });
            offset += len;
        }
        Self {
            slots,
            total_len: offset,
        }
    }

    pub fn slots(&self) -> &[ModuleSlot] {
        &self.slots
    }

    /// Length of the combined vector.
    pub fn total_len(&self) -> usize {
        self.total_len
    }

    /// Concatenate module states in slot order.
    pub fn pack(&self, modules: &[&dyn PhysicsModule]) -> AppResult<DVector<f64>> {
        self.check_modules(modules.iter().map(|m| (m.name(), m.state_len())))?;
        let mut combined = DVector::zeros(self.total_len);
        for (slot, module) in self.slots.iter().zip(modules) {
            let state = module.get_state();
            if state.len() != slot.len {
                return Err(AppError::Layout {
                    what: format!(
                        "module '{}' reported {} state values, slot holds {}",
                        slot.name,
                        state.len(),
                        slot.len
                    ),
                });
            }
            combined.as_mut_slice()[slot.range()].copy_from_slice(&state);
        }
        Ok(combined)
    }

    /// Write each slot of `combined` back into its module.
    ///
    /// The layout is checked for every module before any state is written.
    pub fn unpack(
        &self,
        combined: &DVector<f64>,
        modules: &mut [&mut dyn PhysicsModule],
    ) -> AppResult<()> {
        if combined.len() != self.total_len {
            return Err(AppError::Layout {
                what: format!(
                    "combined state has {} values, layout expects {}",
                    combined.len(),
                    self.total_len
                ),
            });
        }
        self.check_modules(modules.iter().map(|m| (m.name(), m.state_len())))?;
        for (slot, module) in self.slots.iter().zip(modules.iter_mut()) {
            module.set_state(&combined.as_slice()[slot.range()])?;
        }
        Ok(())
    }

    fn check_modules<'a>(
        &self,
        modules: impl ExactSizeIterator<Item = (&'a str, usize)>,
    ) -> AppResult<()> {
        if modules.len() != self.slots.len() {
            return Err(AppError::Layout {
                what: format!(
                    "expected {} modules, got {}",
                    self.slots.len(),
                    modules.len()
                ),
            });
        }
        for (slot, (name, len)) in self.slots.iter().zip(modules) {
            if slot.name != name || slot.len != len {
                return Err(AppError::Layout {
                    what: format!(
                        "slot '{}' (len {}) does not match module '{}' (len {})",
                        slot.name, slot.len, name, len
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fc_physics::{FieldOscillatorModel, FusionModel, FusionParams, OscillatorParams};

    fn modules() -> (FusionModel, FieldOscillatorModel) {
        (
            FusionModel::new(FusionParams::default()).unwrap(),
            FieldOscillatorModel::new(OscillatorParams {
                initial_field: 0.25,
                initial_rate: -1.0,
                ..OscillatorParams::default()
            })
            .unwrap(),
        )
    }

    #[test]
    fn layout_follows_module_order() {
        let (fusion, osc) = modules();
        let composer = StateComposer::from_modules(&[&fusion, &osc]);
        assert_eq!(composer.total_len(), 5);
        assert_eq!(composer.slots()[0].name, "fusion");
        assert_eq!(composer.slots()[0].range(), 0..3);
        assert_eq!(composer.slots()[1].name, "field_oscillator");
        assert_eq!(composer.slots()[1].range(), 3..5);
    }

    #[test]
    fn pack_concatenates_states() {
        let (fusion, osc) = modules();
        let composer = StateComposer::from_modules(&[&fusion, &osc]);
        let y = composer.pack(&[&fusion, &osc]).unwrap();
        assert_eq!(y.as_slice(), &[1.0, 2.0, 2.0, 0.25, -1.0]);
    }

    #[test]
    fn unpack_writes_each_slot() {
        let (mut fusion, mut osc) = modules();
        let composer = StateComposer::from_modules(&[&fusion, &osc]);
        let y = DVector::from_vec(vec![1.5, 2.5, 3.5, 4.5, 5.5]);
        composer.unpack(&y, &mut [&mut fusion, &mut osc]).unwrap();
        assert_eq!(fusion.get_state(), vec![1.5, 2.5, 3.5]);
        assert_eq!(osc.get_state(), vec![4.5, 5.5]);
    }

    #[test]
    fn wrong_combined_length_leaves_modules_untouched() {
        let (mut fusion, mut osc) = modules();
        let composer = StateComposer::from_modules(&[&fusion, &osc]);
        let y = DVector::from_vec(vec![9.0; 4]);
        let err = composer
            .unpack(&y, &mut [&mut fusion, &mut osc])
            .unwrap_err();
        assert!(matches!(err, AppError::Layout { .. }));
        assert_eq!(fusion.get_state(), vec![1.0, 2.0, 2.0]);
        assert_eq!(osc.get_state(), vec![0.25, -1.0]);
    }

    #[test]
    fn module_order_and_count_are_checked() {
        let (mut fusion, mut osc) = modules();
        let composer = StateComposer::from_modules(&[&fusion, &osc]);
        assert!(matches!(
            composer.pack(&[&osc, &fusion]),
            Err(AppError::Layout { .. })
        ));
        assert!(matches!(
            composer.pack(&[&fusion]),
            Err(AppError::Layout { .. })
        ));
        let y = DVector::from_vec(vec![9.0; 5]);
        assert!(matches!(
            composer.unpack(&y, &mut [&mut osc, &mut fusion]),
            Err(AppError::Layout { .. })
        ));
        assert_eq!(fusion.get_state(), vec![1.0, 2.0, 2.0]);
    }
}
