//! The compiled-in parking protocol tables.

/// Ordered `type -> child tags` entries. Order matters: parent resolution
/// returns the first entry listing a tag.
pub const ENTRIES: &[(&str, &[&str])] = &[
    (
        "location",
        &[
            "name",
            "areaNumber",
            "description",
            "address",
            "geoLocations",
            "advancedLocation",
            "contact",
            "auxiliary",
            "areas",
            "occupancies",
            "tariffs",
            "log",
        ],
    ),
    (
        "address",
        &["number", "street", "postalCode", "city", "country"],
    ),
    ("geoLocations", &["geoLocation"]),
    (
        "geoLocation",
        &["latitude", "longitude", "geoType", "locationName"],
    ),
    (
        "contact",
        &["contactName", "organization", "email", "phonenumber"],
    ),
    (
        "auxiliary",
        &[
            "public",
            "paid",
            "locationType",
            "timeZone",
            "operatingHours",
            "surcharges",
        ],
    ),
    ("operatingHours", &["schedule"]),
    ("surcharges", &["taxIncluded", "tax", "other"]),
    ("areas", &["area"]),
    ("area", &["areaName", "areadDescription", "geoLocation"]),
    ("occupancies", &["occupancy"]),
    (
        "occupancy",
        &[
            "locationId",
            "supply",
            "occupied",
            "occupiedPct",
            "average",
            "parkingSpaces",
            "log",
        ],
    ),
    ("parkingSpaces", &["parkingSpace"]),
    (
        "parkingSpace",
        &[
            "spaceId",
            "spaceNumber",
            "status",
            "frequency",
            "occupationStart",
            "occupationEnd",
            "spaceType",
            "detectionType",
            "updated",
        ],
    ),
    ("tariffs", &["tariff"]),
    (
        "tariff",
        &[
            "tariffId",
            "locationId",
            "supersedes",
            "restrictions",
            "rates",
            "activeSchedules",
            "validSchedules",
            "log",
        ],
    ),
    ("rates", &["rate"]),
    ("activeSchedules", &["activeSchedule"]),
    ("validSchedules", &["validSchedule"]),
    (
        "restrictions",
        &[
            "tariffType",
            "maxFee",
            "minFee",
            "maxPaidParkingTime",
            "maxParkingTime",
            "prepaid",
            "resetTime",
            "targetGroup",
            "vehicle",
        ],
    ),
    (
        "rate",
        &[
            "order",
            "value",
            "interval",
            "repeat",
            "intervals",
            "unit",
            "max",
            "countOnlyPaidTime",
        ],
    ),
    (
        "activeSchedule",
        &["activeScheduleId", "startTime", "endTime", "days"],
    ),
    (
        "validSchedule",
        &[
            "validScheduleId",
            "validFrom",
            "validTo",
            "validTimeFrom",
            "validTimeTo",
            "validDays",
        ],
    ),
    ("log", &["updated", "user", "created", "author"]),
];

/// Tags that always hold a sequence, even with a single element.
pub const COLLECTIONS: &[&str] = &[
    "geoLocation",
    "area",
    "occupancy",
    "parkingSpace",
    "tariffs",
    "rates",
    "activeSchedules",
    "validSchedules",
    "days",
    "validDays",
    "targetGroup",
];

pub const BOOLEANS: &[&str] = &[
    "repeat",
    "taxIncluded",
    "public",
    "paid",
    "prepaid",
    "max",
    "countOnlyPaidTime",
];

pub const TIMESTAMPS: &[&str] = &["validFrom", "validTo", "created", "updated"];
