//! Built-in catalogue of platform functions with documentation.

use std::sync::LazyLock;

use super::function::{FunctionDescriptor, Param, ReturnDesc, Signature};
use super::registry::FunctionRegistry;

/// Base URL that help links are derived from unless configured otherwise.
pub const DEFAULT_HELP_BASE_URL: &str = "https://www.emeraldcloudlab.com/helpfiles/";

/// One documented overload: positional `(name, description)` pairs and the
/// `(name, description)` of the return value.
struct Overload {
    params: &'static [(&'static str, &'static str)],
    returns: (&'static str, &'static str),
}

struct BuiltinDef {
    name: &'static str,
    category: &'static str,
    summary: &'static str,
    overloads: &'static [Overload],
}

const PROTOCOL: (&str, &str) = (
    "Protocol",
    "A protocol object that can be confirmed and run in the lab.",
);

const PLOT: (&str, &str) = ("Plot", "A graphical representation of the supplied data.");

const ANALYSIS: (&str, &str) = (
    "Object",
    "An analysis object containing the computed results.",
);

const SAMPLES: (&str, &str) = (
    "Samples",
    "The samples or containers to be processed.",
);

static BUILTIN_DEFS: &[BuiltinDef] = &[
    // ==================== Experiments ====================
    BuiltinDef {
        name: "ExperimentPCR",
        category: "Experiment",
        summary: "Generates a protocol for amplifying target DNA sequences in the input samples by polymerase chain reaction.",
        overloads: &[
            Overload {
                params: &[SAMPLES],
                returns: PROTOCOL,
            },
            Overload {
                params: &[
                    SAMPLES,
                    ("PrimerPairs", "Forward and reverse primer pairs used to amplify each sample."),
                ],
                returns: PROTOCOL,
            },
        ],
    },
    BuiltinDef {
        name: "ExperimentHPLC",
        category: "Experiment",
        summary: "Generates a protocol for separating sample components by high-performance liquid chromatography.",
        overloads: &[Overload {
            params: &[SAMPLES],
            returns: PROTOCOL,
        }],
    },
    BuiltinDef {
        name: "ExperimentNMR",
        category: "Experiment",
        summary: "Generates a protocol for measuring one-dimensional nuclear magnetic resonance spectra of the input samples.",
        overloads: &[Overload {
            params: &[SAMPLES],
            returns: PROTOCOL,
        }],
    },
    BuiltinDef {
        name: "ExperimentNMR2D",
        category: "Experiment",
        summary: "Generates a protocol for measuring two-dimensional nuclear magnetic resonance spectra of the input samples.",
        overloads: &[Overload {
            params: &[SAMPLES],
            returns: PROTOCOL,
        }],
    },
    BuiltinDef {
        name: "ExperimentMassSpectrometry",
        category: "Experiment",
        summary: "Generates a protocol for measuring the mass-to-charge ratio of ions produced from the input samples.",
        overloads: &[Overload {
            params: &[SAMPLES],
            returns: PROTOCOL,
        }],
    },
    BuiltinDef {
        name: "ExperimentAbsorbanceSpectroscopy",
        category: "Experiment",
        summary: "Generates a protocol for measuring absorbance of the input samples across a range of wavelengths.",
        overloads: &[Overload {
            params: &[SAMPLES],
            returns: PROTOCOL,
        }],
    },
    BuiltinDef {
        name: "ExperimentCentrifuge",
        category: "Experiment",
        summary: "Generates a protocol for spinning the input samples at a specified force or rate.",
        overloads: &[Overload {
            params: &[SAMPLES],
            returns: PROTOCOL,
        }],
    },
    BuiltinDef {
        name: "ExperimentIncubate",
        category: "Experiment",
        summary: "Generates a protocol for heating, cooling or mixing the input samples for a period of time.",
        overloads: &[Overload {
            params: &[SAMPLES],
            returns: PROTOCOL,
        }],
    },
    BuiltinDef {
        name: "ExperimentFilter",
        category: "Experiment",
        summary: "Generates a protocol for passing the input samples through a filter to remove particulates.",
        overloads: &[Overload {
            params: &[SAMPLES],
            returns: PROTOCOL,
        }],
    },
    BuiltinDef {
        name: "ExperimentTransfer",
        category: "Experiment",
        summary: "Generates a protocol for moving specified amounts from source samples into destination containers.",
        overloads: &[Overload {
            params: &[
                ("Sources", "The samples or containers to draw from."),
                ("Destinations", "The samples or containers that receive the transfer."),
                ("Amounts", "The volume, mass or count moved for each source/destination pair."),
            ],
            returns: PROTOCOL,
        }],
    },
    BuiltinDef {
        name: "ExperimentDNASynthesis",
        category: "Experiment",
        summary: "Generates a protocol for synthesizing DNA oligomers by solid-phase phosphoramidite chemistry.",
        overloads: &[Overload {
            params: &[("Oligomers", "Sequences, strands or oligomer models to synthesize.")],
            returns: PROTOCOL,
        }],
    },
    BuiltinDef {
        name: "ExperimentSampleManipulation",
        category: "Experiment",
        summary: "Generates a protocol that executes a list of liquid-handling primitives in order.",
        overloads: &[Overload {
            params: &[("Primitives", "The ordered sample manipulation primitives to run.")],
            returns: PROTOCOL,
        }],
    },
    BuiltinDef {
        name: "ExperimentTotalProteinQuantification",
        category: "Experiment",
        summary: "Generates a protocol for determining the total protein concentration of the input samples.",
        overloads: &[Overload {
            params: &[SAMPLES],
            returns: PROTOCOL,
        }],
    },
    BuiltinDef {
        name: "ExperimentPCROptions",
        category: "Experiment",
        summary: "Returns the resolved options that ExperimentPCR would use for the given inputs.",
        overloads: &[Overload {
            params: &[SAMPLES],
            returns: (
                "ResolvedOptions",
                "The resolved options, as a list of rules or a table.",
            ),
        }],
    },
    BuiltinDef {
        name: "ValidExperimentPCRQ",
        category: "Experiment",
        summary: "Checks whether the provided inputs and options form a valid ExperimentPCR call.",
        overloads: &[Overload {
            params: &[SAMPLES],
            returns: (
                "Boolean",
                "True if the call is valid; a test summary if a verbose output format is requested.",
            ),
        }],
    },
    // ==================== Simulations ====================
    BuiltinDef {
        name: "SimulateMeltingTemperature",
        category: "Simulate",
        summary: "Computes the melting temperature of a duplex formed from the given oligomer.",
        overloads: &[
            Overload {
                params: &[("Oligomer", "A sequence, strand or structure to melt.")],
                returns: ("Temperature", "The predicted melting temperature."),
            },
            Overload {
                params: &[
                    ("Oligomer", "A sequence, strand or structure to melt."),
                    ("Concentration", "The total oligomer concentration in solution."),
                ],
                returns: ("Temperature", "The predicted melting temperature."),
            },
        ],
    },
    BuiltinDef {
        name: "SimulateHybridization",
        category: "Simulate",
        summary: "Predicts the structures formed when the given oligomers hybridize.",
        overloads: &[Overload {
            params: &[("Oligomers", "Sequences, strands or structures to hybridize.")],
            returns: ("Simulation", "A simulation object listing the hybridized structures."),
        }],
    },
    BuiltinDef {
        name: "SimulateKinetics",
        category: "Simulate",
        summary: "Integrates a reaction mechanism forward in time from an initial condition.",
        overloads: &[Overload {
            params: &[
                ("Mechanism", "The reaction mechanism or list of reactions."),
                ("InitialCondition", "Initial concentrations of each species."),
                ("Time", "The simulated duration."),
            ],
            returns: ("Simulation", "A simulation object containing species trajectories."),
        }],
    },
    BuiltinDef {
        name: "SimulateFolding",
        category: "Simulate",
        summary: "Predicts secondary structures the given sequence folds into.",
        overloads: &[Overload {
            params: &[("Sequence", "A sequence, strand or structure to fold.")],
            returns: ("Simulation", "A simulation object listing folded structures."),
        }],
    },
    // ==================== Analyses ====================
    BuiltinDef {
        name: "AnalyzePeaks",
        category: "Analyze",
        summary: "Picks peaks in the given data and computes their positions, heights, widths and areas.",
        overloads: &[Overload {
            params: &[("Data", "Data objects or coordinate lists to pick peaks from.")],
            returns: ANALYSIS,
        }],
    },
    BuiltinDef {
        name: "AnalyzeFit",
        category: "Analyze",
        summary: "Fits an expression to the given data points.",
        overloads: &[
            Overload {
                params: &[("Data", "Coordinates or data objects to fit.")],
                returns: ANALYSIS,
            },
            Overload {
                params: &[
                    ("Data", "Coordinates or data objects to fit."),
                    ("Expression", "The fit type or pure function to fit."),
                ],
                returns: ANALYSIS,
            },
        ],
    },
    BuiltinDef {
        name: "AnalyzeMeltingPoint",
        category: "Analyze",
        summary: "Computes melting temperatures from melting-curve data.",
        overloads: &[Overload {
            params: &[("Data", "Melting curve data objects.")],
            returns: ANALYSIS,
        }],
    },
    BuiltinDef {
        name: "AnalyzeStandardCurve",
        category: "Analyze",
        summary: "Fits a standard curve and applies it to convert the input data.",
        overloads: &[Overload {
            params: &[
                ("Data", "The data to convert using the standard curve."),
                ("StandardData", "Known standards the curve is fitted to."),
            ],
            returns: ANALYSIS,
        }],
    },
    // ==================== Plots ====================
    BuiltinDef {
        name: "PlotNMR",
        category: "Plot",
        summary: "Plots nuclear magnetic resonance spectra.",
        overloads: &[Overload {
            params: &[("Spectra", "NMR data objects or raw spectra.")],
            returns: PLOT,
        }],
    },
    BuiltinDef {
        name: "PlotChromatography",
        category: "Plot",
        summary: "Plots chromatograms from chromatography data.",
        overloads: &[Overload {
            params: &[("Chromatograms", "Chromatography data objects or raw traces.")],
            returns: PLOT,
        }],
    },
    BuiltinDef {
        name: "PlotMassSpectrometry",
        category: "Plot",
        summary: "Plots mass spectra.",
        overloads: &[Overload {
            params: &[("Spectra", "Mass spectrometry data objects or raw spectra.")],
            returns: PLOT,
        }],
    },
    BuiltinDef {
        name: "PlotAbsorbanceSpectroscopy",
        category: "Plot",
        summary: "Plots absorbance spectra.",
        overloads: &[Overload {
            params: &[("Spectra", "Absorbance data objects or raw spectra.")],
            returns: PLOT,
        }],
    },
    BuiltinDef {
        name: "PlotPeaks",
        category: "Plot",
        summary: "Plots picked peaks as a table or bar chart.",
        overloads: &[Overload {
            params: &[("Peaks", "Peak analysis objects.")],
            returns: PLOT,
        }],
    },
    BuiltinDef {
        name: "PlotObject",
        category: "Plot",
        summary: "Plots any object using the plot function appropriate for its type.",
        overloads: &[
            Overload {
                params: &[("Object", "An object or list of objects to plot.")],
                returns: PLOT,
            },
            Overload {
                params: &[
                    ("Object", "An object or list of objects to plot."),
                    ("Field", "The field of the object to plot."),
                ],
                returns: PLOT,
            },
        ],
    },
    // ==================== Uploads ====================
    BuiltinDef {
        name: "UploadMolecule",
        category: "Upload",
        summary: "Creates a molecule model from a structure, identifier or name.",
        overloads: &[
            Overload {
                params: &[(
                    "Molecule",
                    "A structure, PubChem identifier, CAS number, InChI or molecule name.",
                )],
                returns: ("Model", "The newly created molecule model."),
            },
            Overload {
                params: &[
                    (
                        "Molecule",
                        "A structure, PubChem identifier, CAS number, InChI or molecule name.",
                    ),
                    ("Name", "The name given to the new model."),
                ],
                returns: ("Model", "The newly created molecule model."),
            },
        ],
    },
    BuiltinDef {
        name: "UploadSampleModel",
        category: "Upload",
        summary: "Creates a sample model describing the composition of a sample.",
        overloads: &[Overload {
            params: &[("Name", "The name given to the new sample model.")],
            returns: ("Model", "The newly created sample model."),
        }],
    },
    BuiltinDef {
        name: "UploadOligomer",
        category: "Upload",
        summary: "Creates an oligomer model from a sequence, strand or structure.",
        overloads: &[Overload {
            params: &[("Oligomer", "A sequence, strand or structure.")],
            returns: ("Model", "The newly created oligomer model."),
        }],
    },
    BuiltinDef {
        name: "UploadProduct",
        category: "Upload",
        summary: "Creates a product object describing an item that can be ordered from a supplier.",
        overloads: &[Overload {
            params: &[("ProductURL", "The supplier web page of the product.")],
            returns: ("Object", "The newly created product object."),
        }],
    },
    // ==================== Protocols ====================
    BuiltinDef {
        name: "ConfirmProtocol",
        category: "Protocol",
        summary: "Moves protocols from the in-cart state into the lab queue.",
        overloads: &[Overload {
            params: &[("Protocols", "The protocols to confirm.")],
            returns: ("Protocols", "The confirmed protocols."),
        }],
    },
    BuiltinDef {
        name: "CancelProtocol",
        category: "Protocol",
        summary: "Cancels protocols that have not yet started running.",
        overloads: &[Overload {
            params: &[("Protocols", "The protocols to cancel.")],
            returns: ("Protocols", "The canceled protocols."),
        }],
    },
];

/// All built-in descriptors, with help links under the default base URL.
pub static BUILTINS: LazyLock<FunctionRegistry> = LazyLock::new(|| {
    let mut registry = FunctionRegistry::new();
    for descriptor in builtin_descriptors(DEFAULT_HELP_BASE_URL) {
        if let Err(e) = registry.register(descriptor) {
            tracing::error!("invalid builtin descriptor: {}", e);
        }
    }
    registry
});

/// Build the built-in descriptors with help links under `help_base_url`.
pub fn builtin_descriptors(help_base_url: &str) -> Vec<FunctionDescriptor> {
    BUILTIN_DEFS
        .iter()
        .map(|def| {
            let mut descriptor =
                FunctionDescriptor::new(def.name, help_url_for(help_base_url, def.name))
                    .with_summary(def.summary)
                    .with_category(def.category);
            for overload in def.overloads {
                let params = overload
                    .params
                    .iter()
                    .map(|&(name, description)| Param::new(name, description))
                    .collect();
                let (name, description) = overload.returns;
                descriptor =
                    descriptor.with_signature(Signature::new(params, ReturnDesc::new(name, description)));
            }
            descriptor
        })
        .collect()
}

/// Derive the help link for `name` under `base`.
pub fn help_url_for(base: &str, name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), name.to_ascii_lowercase())
}

/// Check if a name is a built-in function.
pub fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(name)
}

/// Get documentation for a built-in function by name.
pub fn get_builtin(name: &str) -> Option<&'static FunctionDescriptor> {
    BUILTINS.get(name)
}
