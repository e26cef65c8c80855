//! Built-in unit catalogue - the categories dashboards and widgets pick from

use std::f64::consts::PI;

use super::{CategorySpec, SystemSpec};
use crate::Transform;

/// The built-in catalogue, in display order
pub fn builtin_catalogue() -> Vec<CategorySpec> {
    vec![
        acceleration(),
        angle(),
        area(),
        capacitance(),
        density(),
        digital(),
        electric_current(),
        energy(),
        force(),
        frequency(),
        fuel_efficiency(),
        illuminance(),
        length(),
        mass(),
        power(),
        pressure(),
        radioactivity(),
        resistance(),
        speed(),
        temperature(),
        time(),
        torque(),
        voltage(),
        volume(),
    ]
}

fn acceleration() -> CategorySpec {
    CategorySpec::new("acceleration")
        .metric(SystemSpec::new()
            .ratio(3.28084)
            .unit("m/s²", "unit.meter-per-second-squared", &["acceleration", "linear acceleration"], 1.0)
            .unit("km/h²", "unit.kilometer-per-hour-squared", &["acceleration"], 1.0 / 12960.0)
            .unit("Gal", "unit.gal", &["acceleration", "gravimetry"], 0.01)
            .unit("g", "unit.g-force", &["acceleration", "gravity", "g-force"], 9.80665))
        .imperial(SystemSpec::new()
            .ratio(0.3048)
            .unit("ft/s²", "unit.foot-per-second-squared", &["acceleration"], 1.0)
            .unit("in/s²", "unit.inch-per-second-squared", &["acceleration"], 1.0 / 12.0))
}

fn angle() -> CategorySpec {
    CategorySpec::new("angle")
        .metric(SystemSpec::new()
            .unit("deg", "unit.degree", &["angle", "rotation"], 1.0)
            .unit("rad", "unit.radian", &["angle", "rotation"], 180.0 / PI)
            .unit("mrad", "unit.milliradian", &["angle"], 0.18 / PI)
            .unit("grad", "unit.gradian", &["angle", "gon"], 0.9)
            .unit("arcmin", "unit.arcminute", &["angle"], 1.0 / 60.0)
            .unit("arcsec", "unit.arcsecond", &["angle"], 1.0 / 3600.0)
            .unit("rev", "unit.revolution", &["angle", "turn"], 360.0))
}

fn area() -> CategorySpec {
    CategorySpec::new("area")
        .metric(SystemSpec::new()
            .ratio(10.76391041671)
            .unit("m²", "unit.square-meter", &["area", "surface"], 1.0)
            .unit("mm²", "unit.square-millimeter", &["area"], 1e-6)
            .unit("cm²", "unit.square-centimeter", &["area"], 1e-4)
            .unit("a", "unit.are", &["area", "land"], 100.0)
            .unit("ha", "unit.hectare", &["area", "land"], 1e4)
            .unit("km²", "unit.square-kilometer", &["area", "land"], 1e6))
        .imperial(SystemSpec::new()
            .ratio(0.09290304)
            .unit("ft²", "unit.square-foot", &["area", "surface"], 1.0)
            .unit("in²", "unit.square-inch", &["area"], 1.0 / 144.0)
            .unit("yd²", "unit.square-yard", &["area"], 9.0)
            .unit("ac", "unit.acre", &["area", "land"], 43560.0)
            .unit("mi²", "unit.square-mile", &["area", "land"], 27878400.0))
}

fn capacitance() -> CategorySpec {
    CategorySpec::new("capacitance")
        .metric(SystemSpec::new()
            .unit("F", "unit.farad", &["capacitance", "electric capacitance"], 1.0)
            .unit("mF", "unit.millifarad", &["capacitance"], 1e-3)
            .unit("µF", "unit.microfarad", &["capacitance"], 1e-6)
            .unit("nF", "unit.nanofarad", &["capacitance"], 1e-9)
            .unit("pF", "unit.picofarad", &["capacitance"], 1e-12))
}

fn density() -> CategorySpec {
    CategorySpec::new("density")
        .metric(SystemSpec::new()
            .ratio(0.062428)
            .unit("kg/m³", "unit.kilogram-per-cubic-meter", &["density", "mass density"], 1.0)
            .unit("g/cm³", "unit.gram-per-cubic-centimeter", &["density"], 1000.0)
            .unit("kg/L", "unit.kilogram-per-liter", &["density"], 1000.0)
            .unit("g/L", "unit.gram-per-liter", &["density", "concentration"], 1.0)
            .unit("mg/L", "unit.milligram-per-liter", &["density", "concentration"], 1e-3)
            .unit("t/m³", "unit.tonne-per-cubic-meter", &["density", "bulk density"], 1000.0))
        .imperial(SystemSpec::new()
            .ratio(16.0185)
            .unit("lb/ft³", "unit.pound-per-cubic-foot", &["density"], 1.0)
            .unit("lb/in³", "unit.pound-per-cubic-inch", &["density"], 1728.0)
            .unit("oz/in³", "unit.ounce-per-cubic-inch", &["density"], 108.0)
            .unit("lb/gal", "unit.pound-per-gallon", &["density"], 7.48051948))
}

fn digital() -> CategorySpec {
    CategorySpec::new("digital")
        .metric(SystemSpec::new()
            .unit("bit", "unit.bit", &["data", "information"], 1.0)
            .unit("B", "unit.byte", &["data", "storage"], 8.0)
            .unit("kB", "unit.kilobyte", &["data", "storage"], 8e3)
            .unit("MB", "unit.megabyte", &["data", "storage"], 8e6)
            .unit("GB", "unit.gigabyte", &["data", "storage"], 8e9)
            .unit("TB", "unit.terabyte", &["data", "storage"], 8e12)
            .unit("KiB", "unit.kibibyte", &["data", "storage", "binary"], 8192.0)
            .unit("MiB", "unit.mebibyte", &["data", "storage", "binary"], 8388608.0)
            .unit("GiB", "unit.gibibyte", &["data", "storage", "binary"], 8589934592.0))
}

fn electric_current() -> CategorySpec {
    CategorySpec::new("electric-current")
        .metric(SystemSpec::new()
            .unit("A", "unit.ampere", &["current", "electric current"], 1.0)
            .unit("mA", "unit.milliampere", &["current"], 1e-3)
            .unit("µA", "unit.microampere", &["current"], 1e-6)
            .unit("kA", "unit.kiloampere", &["current"], 1e3))
}

fn energy() -> CategorySpec {
    CategorySpec::new("energy")
        .metric(SystemSpec::new()
            .ratio(0.000947817)
            .unit("J", "unit.joule", &["energy", "work", "heat"], 1.0)
            .unit("kJ", "unit.kilojoule", &["energy"], 1e3)
            .unit("MJ", "unit.megajoule", &["energy"], 1e6)
            .unit("Wh", "unit.watt-hour", &["energy", "electricity"], 3600.0)
            .unit("kWh", "unit.kilowatt-hour", &["energy", "electricity", "consumption"], 3.6e6)
            .unit("MWh", "unit.megawatt-hour", &["energy", "electricity"], 3.6e9)
            .unit("cal", "unit.calorie", &["energy", "heat"], 4.184)
            .unit("kcal", "unit.kilocalorie", &["energy", "heat", "food"], 4184.0)
            .unit("eV", "unit.electron-volt", &["energy"], 1.602176634e-19))
        .imperial(SystemSpec::new()
            .ratio(1055.06)
            .unit("BTU", "unit.british-thermal-unit", &["energy", "heat"], 1.0)
            .unit("thm", "unit.therm", &["energy", "gas"], 1e5)
            .unit("ft·lbf", "unit.foot-pound", &["energy", "work"], 1.0 / 778.169))
}

fn force() -> CategorySpec {
    CategorySpec::new("force")
        .metric(SystemSpec::new()
            .ratio(0.224809)
            .unit("N", "unit.newton", &["force", "load"], 1.0)
            .unit("mN", "unit.millinewton", &["force"], 1e-3)
            .unit("kN", "unit.kilonewton", &["force", "load"], 1e3)
            .unit("dyn", "unit.dyne", &["force"], 1e-5)
            .unit("kgf", "unit.kilogram-force", &["force", "weight"], 9.80665))
        .imperial(SystemSpec::new()
            .ratio(4.44822)
            .unit("lbf", "unit.pound-force", &["force", "weight"], 1.0)
            .unit("ozf", "unit.ounce-force", &["force"], 1.0 / 16.0)
            .unit("kip", "unit.kip", &["force", "load"], 1000.0)
            .unit("pdl", "unit.poundal", &["force"], 0.031081))
}

fn frequency() -> CategorySpec {
    CategorySpec::new("frequency")
        .metric(SystemSpec::new()
            .unit("Hz", "unit.hertz", &["frequency"], 1.0)
            .unit("mHz", "unit.millihertz", &["frequency"], 1e-3)
            .unit("kHz", "unit.kilohertz", &["frequency"], 1e3)
            .unit("MHz", "unit.megahertz", &["frequency", "radio"], 1e6)
            .unit("GHz", "unit.gigahertz", &["frequency", "radio"], 1e9)
            .unit("rpm", "unit.revolutions-per-minute", &["frequency", "rotation speed"], 1.0 / 60.0))
}

fn fuel_efficiency() -> CategorySpec {
    CategorySpec::new("fuel-efficiency")
        .metric(SystemSpec::new()
            .ratio(2.352145)
            .unit("km/L", "unit.kilometer-per-liter", &["fuel efficiency", "mileage"], 1.0)
            .transformed("L/100km", "unit.liter-per-100-km", &["fuel consumption"], Transform::reciprocal(100.0)))
        .imperial(SystemSpec::new()
            .ratio(0.425144)
            .unit("mpg", "unit.mile-per-gallon", &["fuel efficiency", "mileage"], 1.0)
            .unit("mpg-imp", "unit.mile-per-imperial-gallon", &["fuel efficiency", "mileage"], 1.200950)
            .transformed("gal/100mi", "unit.gallon-per-100-miles", &["fuel consumption"], Transform::reciprocal(100.0)))
}

fn illuminance() -> CategorySpec {
    // Neither table states a ratio; the category links lux to foot-candles
    CategorySpec::new("illuminance")
        .ratio(0.09290304)
        .metric(SystemSpec::new()
            .unit("lx", "unit.lux", &["illuminance", "light"], 1.0)
            .unit("klx", "unit.kilolux", &["illuminance", "daylight"], 1e3))
        .imperial(SystemSpec::new()
            .unit("fc", "unit.foot-candle", &["illuminance", "light"], 1.0))
}

fn length() -> CategorySpec {
    CategorySpec::new("length")
        .metric(SystemSpec::new()
            .ratio(3.28084)
            .unit("m", "unit.meter", &["length", "distance", "height"], 1.0)
            .unit("nm", "unit.nanometer", &["length", "wavelength"], 1e-9)
            .unit("µm", "unit.micrometer", &["length"], 1e-6)
            .unit("mm", "unit.millimeter", &["length", "distance"], 1e-3)
            .unit("cm", "unit.centimeter", &["length", "distance"], 1e-2)
            .unit("dm", "unit.decimeter", &["length"], 0.1)
            .unit("km", "unit.kilometer", &["length", "distance"], 1e3))
        .imperial(SystemSpec::new()
            .ratio(0.3048)
            .unit("ft", "unit.foot", &["length", "distance", "height"], 1.0)
            .unit("mil", "unit.mil", &["length", "thickness"], 1.0 / 12000.0)
            .unit("in", "unit.inch", &["length", "distance"], 1.0 / 12.0)
            .unit("yd", "unit.yard", &["length", "distance"], 3.0)
            .unit("mi", "unit.mile", &["length", "distance"], 5280.0)
            .unit("nmi", "unit.nautical-mile", &["length", "distance", "navigation"], 6076.12))
}

fn mass() -> CategorySpec {
    CategorySpec::new("mass")
        .metric(SystemSpec::new()
            .ratio(2.20462)
            .unit("kg", "unit.kilogram", &["mass", "weight"], 1.0)
            .unit("µg", "unit.microgram", &["mass"], 1e-9)
            .unit("mg", "unit.milligram", &["mass"], 1e-6)
            .unit("g", "unit.gram", &["mass", "weight"], 1e-3)
            .unit("t", "unit.tonne", &["mass", "weight"], 1e3))
        .imperial(SystemSpec::new()
            .ratio(0.45359237)
            .unit("lb", "unit.pound", &["mass", "weight"], 1.0)
            .unit("gr", "unit.grain", &["mass"], 1.0 / 7000.0)
            .unit("oz", "unit.ounce", &["mass", "weight"], 1.0 / 16.0)
            .unit("st", "unit.stone", &["mass", "weight"], 14.0)
            .unit("short tn", "unit.short-ton", &["mass", "weight"], 2000.0)
            .unit("long tn", "unit.long-ton", &["mass", "weight"], 2240.0))
}

fn power() -> CategorySpec {
    CategorySpec::new("power")
        .metric(SystemSpec::new()
            .ratio(0.00134102)
            .unit("W", "unit.watt", &["power"], 1.0)
            .unit("mW", "unit.milliwatt", &["power"], 1e-3)
            .unit("kW", "unit.kilowatt", &["power", "electricity"], 1e3)
            .unit("MW", "unit.megawatt", &["power", "electricity"], 1e6)
            .unit("GW", "unit.gigawatt", &["power", "electricity"], 1e9)
            .unit("PS", "unit.metric-horsepower", &["power", "engine"], 735.49875))
        .imperial(SystemSpec::new()
            .ratio(745.699872)
            .unit("hp", "unit.horsepower", &["power", "engine"], 1.0)
            .unit("BTU/h", "unit.btu-per-hour", &["power", "heating", "cooling"], 1.0 / 2544.43)
            .unit("ft·lbf/s", "unit.foot-pound-per-second", &["power"], 1.0 / 550.0))
}

fn pressure() -> CategorySpec {
    CategorySpec::new("pressure")
        .metric(SystemSpec::new()
            .ratio(0.000145038)
            .unit("Pa", "unit.pascal", &["pressure"], 1.0)
            .unit("hPa", "unit.hectopascal", &["pressure", "atmospheric pressure"], 100.0)
            .unit("kPa", "unit.kilopascal", &["pressure"], 1e3)
            .unit("MPa", "unit.megapascal", &["pressure", "stress"], 1e6)
            .unit("mbar", "unit.millibar", &["pressure"], 100.0)
            .unit("bar", "unit.bar", &["pressure"], 1e5)
            .unit("atm", "unit.atmosphere", &["pressure"], 101325.0)
            .unit("mmHg", "unit.millimeter-of-mercury", &["pressure", "blood pressure"], 133.322387415)
            .unit("Torr", "unit.torr", &["pressure", "vacuum"], 133.322368421))
        .imperial(SystemSpec::new()
            .ratio(6894.757293168)
            .unit("psi", "unit.pound-per-square-inch", &["pressure", "tire pressure"], 1.0)
            .unit("ksi", "unit.kilopound-per-square-inch", &["pressure", "stress"], 1e3)
            .unit("psf", "unit.pound-per-square-foot", &["pressure"], 1.0 / 144.0)
            .unit("inHg", "unit.inch-of-mercury", &["pressure", "barometric"], 0.491154))
}

fn radioactivity() -> CategorySpec {
    CategorySpec::new("radioactivity")
        .metric(SystemSpec::new()
            .unit("Bq", "unit.becquerel", &["radioactivity", "activity"], 1.0)
            .unit("kBq", "unit.kilobecquerel", &["radioactivity"], 1e3)
            .unit("MBq", "unit.megabecquerel", &["radioactivity"], 1e6)
            .unit("GBq", "unit.gigabecquerel", &["radioactivity"], 1e9)
            .unit("TBq", "unit.terabecquerel", &["radioactivity"], 1e12)
            .unit("Rd", "unit.rutherford", &["radioactivity"], 1e6)
            .unit("Ci", "unit.curie", &["radioactivity"], 3.7e10)
            .unit("mCi", "unit.millicurie", &["radioactivity"], 3.7e7)
            .unit("µCi", "unit.microcurie", &["radioactivity"], 3.7e4))
}

fn resistance() -> CategorySpec {
    CategorySpec::new("resistance")
        .metric(SystemSpec::new()
            .unit("Ω", "unit.ohm", &["resistance", "electrical resistance"], 1.0)
            .unit("mΩ", "unit.milliohm", &["resistance"], 1e-3)
            .unit("kΩ", "unit.kiloohm", &["resistance"], 1e3)
            .unit("MΩ", "unit.megaohm", &["resistance", "insulation"], 1e6)
            .unit("GΩ", "unit.gigaohm", &["resistance", "insulation"], 1e9))
}

fn speed() -> CategorySpec {
    CategorySpec::new("speed")
        .metric(SystemSpec::new()
            .ratio(3.28084)
            .unit("m/s", "unit.meter-per-second", &["speed", "velocity"], 1.0)
            .unit("km/h", "unit.kilometer-per-hour", &["speed", "velocity"], 1.0 / 3.6)
            .unit("mm/s", "unit.millimeter-per-second", &["speed", "flow velocity"], 1e-3)
            .unit("kn", "unit.knot", &["speed", "navigation"], 0.514444))
        .imperial(SystemSpec::new()
            .ratio(0.3048)
            .unit("ft/s", "unit.foot-per-second", &["speed", "velocity"], 1.0)
            .unit("ft/min", "unit.foot-per-minute", &["speed", "air flow"], 1.0 / 60.0)
            .unit("in/s", "unit.inch-per-second", &["speed"], 1.0 / 12.0)
            .unit("mph", "unit.mile-per-hour", &["speed", "velocity"], 5280.0 / 3600.0))
}

fn temperature() -> CategorySpec {
    // Anchored on °C; the offset scales are affine transforms
    CategorySpec::new("temperature")
        .metric(SystemSpec::new()
            .unit("°C", "unit.celsius", &["temperature", "heat"], 1.0)
            .transformed("K", "unit.kelvin", &["temperature", "absolute"], Transform::affine(1.0, -273.15))
            .transformed("°F", "unit.fahrenheit", &["temperature", "heat"], Transform::affine(5.0 / 9.0, -160.0 / 9.0))
            .transformed("°R", "unit.rankine", &["temperature", "absolute"], Transform::affine(5.0 / 9.0, -273.15)))
}

fn time() -> CategorySpec {
    CategorySpec::new("time")
        .metric(SystemSpec::new()
            .unit("s", "unit.second", &["time", "duration"], 1.0)
            .unit("ns", "unit.nanosecond", &["time"], 1e-9)
            .unit("µs", "unit.microsecond", &["time"], 1e-6)
            .unit("ms", "unit.millisecond", &["time", "latency"], 1e-3)
            .unit("min", "unit.minute", &["time", "duration"], 60.0)
            .unit("h", "unit.hour", &["time", "duration"], 3600.0)
            .unit("d", "unit.day", &["time", "duration"], 86400.0)
            .unit("wk", "unit.week", &["time"], 604800.0)
            .unit("mo", "unit.month", &["time"], 2629746.0)
            .unit("yr", "unit.year", &["time"], 31556952.0))
}

fn torque() -> CategorySpec {
    CategorySpec::new("torque")
        .metric(SystemSpec::new()
            .ratio(0.737562)
            .unit("Nm", "unit.newton-meter", &["torque", "moment of force"], 1.0)
            .unit("N·cm", "unit.newton-centimeter", &["torque"], 0.01)
            .unit("kNm", "unit.kilonewton-meter", &["torque"], 1e3)
            .unit("kgf·m", "unit.kilogram-force-meter", &["torque"], 9.80665))
        .imperial(SystemSpec::new()
            .ratio(1.355818)
            .unit("lbf·ft", "unit.pound-force-foot", &["torque", "moment of force"], 1.0)
            .unit("lbf·in", "unit.pound-force-inch", &["torque"], 1.0 / 12.0)
            .unit("ozf·in", "unit.ounce-force-inch", &["torque"], 1.0 / 192.0))
}

fn voltage() -> CategorySpec {
    CategorySpec::new("voltage")
        .metric(SystemSpec::new()
            .unit("V", "unit.volt", &["voltage", "electric potential"], 1.0)
            .unit("µV", "unit.microvolt", &["voltage"], 1e-6)
            .unit("mV", "unit.millivolt", &["voltage"], 1e-3)
            .unit("kV", "unit.kilovolt", &["voltage", "high voltage"], 1e3)
            .unit("MV", "unit.megavolt", &["voltage"], 1e6))
}

fn volume() -> CategorySpec {
    CategorySpec::new("volume")
        .metric(SystemSpec::new()
            .ratio(33.8140227)
            .unit("L", "unit.liter", &["volume", "capacity"], 1.0)
            .unit("mL", "unit.milliliter", &["volume"], 1e-3)
            .unit("cm³", "unit.cubic-centimeter", &["volume"], 1e-3)
            .unit("dL", "unit.deciliter", &["volume"], 0.1)
            .unit("hL", "unit.hectoliter", &["volume"], 100.0)
            .unit("m³", "unit.cubic-meter", &["volume", "capacity", "gas"], 1e3))
        .imperial(SystemSpec::new()
            .ratio(0.0295735295625)
            .unit("fl-oz", "unit.fluid-ounce", &["volume"], 1.0)
            .unit("tsp", "unit.teaspoon", &["volume", "kitchen"], 1.0 / 6.0)
            .unit("tbsp", "unit.tablespoon", &["volume", "kitchen"], 0.5)
            .unit("cup", "unit.cup", &["volume", "kitchen"], 8.0)
            .unit("pt", "unit.pint", &["volume"], 16.0)
            .unit("qt", "unit.quart", &["volume"], 32.0)
            .unit("gal", "unit.gallon", &["volume", "capacity"], 128.0)
            .unit("in³", "unit.cubic-inch", &["volume"], 0.554113)
            .unit("ft³", "unit.cubic-foot", &["volume", "gas"], 957.506))
}
