use crate::layers::LayerStack;
use crate::stratigraphy::StratigraphyGrid;
use log::debug;
use ndarray::{Array2, Zip};

/// Acoustic impedance (velocity × density) of every model cell.
#[derive(Clone, Debug)]
pub struct ImpedanceGrid {
    values: Array2<f64>,
}

impl ImpedanceGrid {
    pub fn values(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.values
    }
}

impl From<Array2<f64>> for ImpedanceGrid {
    fn from(values: Array2<f64>) -> Self {
        Self { values }
    }
}

pub struct ImpedanceModel<'a> {
    layers: &'a LayerStack,
}

impl<'a> ImpedanceModel<'a> {
    pub fn new(layers: &'a LayerStack) -> Self {
        Self { layers }
    }

    pub fn compute(&self, stratigraphy: &StratigraphyGrid) -> ImpedanceGrid {
        let layers = self.layers;
        let values = Zip::from(stratigraphy.labels()).par_map_collect(|&label| layers.impedance(label));
        debug!("Impedance grid {:?}", values.dim());
        ImpedanceGrid { values }
    }
}
