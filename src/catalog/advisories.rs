//! Built-in class labels and treatment advice, in classifier output order.

/// `(label, advisory)` pairs; the position of each pair is its class index.
pub const BUILTIN_ENTRIES: [(&str, &str); 14] = [
    (
        "Apple-Apple_scab",
        "Apple scab is a fungal disease that commonly affects apple trees, causing dark scaly lesions on leaves and fruit. \
         To manage Apple scab, use fungicides such as copper-based sprays (e.g., Copper Fungicide). Additionally, maintaining \
         good orchard hygiene, including proper pruning and removal of infected leaves, helps prevent the spread of the disease.",
    ),
    (
        "Blueberry-healthy",
        "No disease detected. The plant is healthy. Blueberries are susceptible to various diseases, so it is crucial to \
         monitor the plants regularly for any signs of infection. Implementing proper care and hygiene practices contributes \
         to overall plant health.",
    ),
    (
        "Cherry-Powdery_mildew",
        "Powdery mildew is a common fungal disease affecting cherries. It appears as a white powdery substance on leaves and \
         can impact fruit development. Control measures include using fungicides specifically designed for powdery mildew (e.g., \
         Funginex). Pruning affected branches and improving air circulation around the tree also help manage the disease.",
    ),
    (
        "Corn-Common_rust",
        "Common rust is a fungal disease that affects corn plants. It presents as orange-brown pustules on leaves. Fungicides \
         can be used to manage common rust, and planting resistant corn varieties is recommended. Remove and destroy infected \
         plants to prevent the disease from spreading.",
    ),
    (
        "Grape-Black_rot",
        "Black rot is a fungal disease affecting grapevines. It causes dark lesions on leaves and can lead to fruit rot. Manage \
         black rot by applying fungicides during the growing season (e.g., Captan). Practice good vineyard management, including \
         pruning and proper spacing, to reduce humidity and minimize disease development.",
    ),
    (
        "Raspberry-healthy",
        "No disease detected. The plant is healthy. Raspberry plants are susceptible to various diseases, including fungal \
         infections and viruses. Regular monitoring and proper care, such as adequate spacing and removal of infected canes, \
         help maintain plant health.",
    ),
    (
        "Orange-Citrus_greening",
        "Citrus greening, also known as Huanglongbing, is a bacterial disease affecting citrus trees. It is transmitted by the \
         Asian citrus psyllid. Control measures include managing psyllid populations, removing and destroying infected trees, \
         and applying appropriate bactericides (e.g., Streptomycin). Early detection and intervention are crucial for disease \
         management.",
    ),
    (
        "Pepper_bell-Bacterial_spot",
        "Bacterial spot is a common bacterial disease affecting bell peppers. Copper-based sprays are effective in managing \
         bacterial spot (e.g., Kocide). Planting disease-resistant pepper varieties and providing proper spacing for the air \
         circulation can help prevent the disease.",
    ),
    (
        "Potato-Early_blight",
        "Early blight is a fungal disease that affects potato plants. It causes dark lesions on leaves and can reduce yields. \
         Control measures include applying fungicides (e.g., Mancozeb), practicing crop rotation, and removing infected plant  \
         material. Proper irrigation management also helps prevent the development of early blight.",
    ),
    (
        "Peach-Bacterial_spot",
        "Bacterial spot is a bacterial disease affecting peaches. It causes dark lesions on leaves and fruit. Manage bacterial \
         spot by applying copper sprays during the growing season (e.g., Cuprofix). Proper pruning and air circulation help reduce \
         disease incidence.",
    ),
    (
        "Soybean-healthy",
        "No disease detected. The plant is healthy. Soybean plants are susceptible to various diseases, mainly pests destroy the \
         crops. Maintain soybean health by monitoring for pests and diseases regularly. Ensure well-drained soil with appropriate \
         fertility levels for optimal growth and use balanced fertilizers rich in nitrogen to support lush foliage. ",
    ),
    (
        "Squash-Powdery_mildew",
        "Powdery mildew is a fungal disease that commonly affects squash plants. It appears as a white powdery substance on leaves. \
         Control measures include using fungicides labeled for powdery mildew (e.g., Sulfur) and planting disease-resistant varieties. \
         Proper spacing and airflow also help prevent the disease.",
    ),
    (
        "Strawberry-Leaf_scorch",
        "Leaf scorch is a disease affecting strawberries, causing browning and necrosis of leaf edges. Control measures include \
         applying fungicides (e.g., Propiconazole), removing and destroying infected plants, and maintaining proper irrigation. \
         Good air circulation is essential to reduce humidity and prevent leaf scorch.",
    ),
    (
        "Tomato-Bacterial_spot",
        "Bacterial spot is a bacterial disease affecting tomatoes. It causes dark lesions on leaves and fruit. Control measures include \
         applying copper-based sprays (e.g., Bordeaux mixture), avoiding overhead irrigation, and practicing crop rotation. Early detection \
         and removal of infected plants help manage bacterial spot.",
    ),
];
